use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use chrono::Local;
use eframe::egui;
use shared::notification::{Notification, NotificationLevel};

const MAX_VISIBLE_TOASTS: usize = 5;
const SUCCESS_FILL: egui::Color32 = egui::Color32::from_rgb(7, 188, 12);
const ERROR_FILL: egui::Color32 = egui::Color32::from_rgb(231, 76, 60);

struct Toast {
    notification: Notification,
    shown_at: Instant,
}

/// Transient notifications stacked in the top-right corner.
pub struct ToastStack {
    toasts: VecDeque<Toast>,
    lifetime: Duration,
}

impl ToastStack {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            lifetime,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }

    fn push_at(&mut self, notification: Notification, now: Instant) {
        self.toasts.push_back(Toast {
            notification,
            shown_at: now,
        });
        while self.toasts.len() > MAX_VISIBLE_TOASTS {
            self.toasts.pop_front();
        }
    }

    pub fn prune(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < lifetime);
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    #[cfg(test)]
    fn messages(&self) -> impl Iterator<Item = &Notification> {
        self.toasts.iter().map(|toast| &toast.notification)
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("toast_region"))
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for (idx, toast) in self.toasts.iter().enumerate() {
                    let fill = match toast.notification.level {
                        NotificationLevel::Success => SUCCESS_FILL,
                        NotificationLevel::Error => ERROR_FILL,
                    };
                    let response = egui::Frame::popup(ui.style())
                        .fill(fill)
                        .show(ui, |ui| {
                            ui.set_min_width(240.0);
                            ui.label(
                                egui::RichText::new(&toast.notification.message)
                                    .color(egui::Color32::WHITE)
                                    .strong(),
                            );
                            let stamp = toast
                                .notification
                                .raised_at
                                .with_timezone(&Local)
                                .format("%H:%M:%S")
                                .to_string();
                            ui.label(egui::RichText::new(stamp).small().color(egui::Color32::WHITE));
                        })
                        .response
                        .interact(egui::Sense::click());
                    if response.clicked() {
                        dismissed = Some(idx);
                    }
                    ui.add_space(6.0);
                }
            });

        if let Some(idx) = dismissed {
            self.toasts.remove(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_lifetime() {
        let start = Instant::now();
        let mut stack = ToastStack::new(Duration::from_secs(5));
        stack.push_at(Notification::success("Minted successfully!"), start);
        stack.push_at(
            Notification::error("Minting failed. Try again!"),
            start + Duration::from_secs(3),
        );

        stack.prune(start + Duration::from_secs(4));
        assert_eq!(stack.messages().count(), 2);

        stack.prune(start + Duration::from_secs(6));
        let remaining: Vec<_> = stack.messages().map(|n| n.message.as_str()).collect();
        assert_eq!(remaining, vec!["Minting failed. Try again!"]);

        stack.prune(start + Duration::from_secs(9));
        assert!(stack.is_empty());
    }

    #[test]
    fn oldest_toast_is_dropped_when_stack_is_full() {
        let now = Instant::now();
        let mut stack = ToastStack::new(Duration::from_secs(5));
        for n in 0..=MAX_VISIBLE_TOASTS {
            stack.push_at(Notification::error(format!("toast {n}")), now);
        }

        assert_eq!(stack.messages().count(), MAX_VISIBLE_TOASTS);
        assert_eq!(stack.messages().next().map(|n| n.message.as_str()), Some("toast 1"));
    }
}
