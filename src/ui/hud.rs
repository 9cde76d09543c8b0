use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use super::app::dispatch;
use super::state::AppState;
use crate::game::Input;

fn attempts_text(attempts: u32) -> String {
    format!("Attempts: {attempts}")
}

fn matches_text(matches: u32) -> String {
    format!("Matches: {matches}")
}

pub(super) fn build_stats_bar(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let bar = gtk::Box::new(gtk::Orientation::Horizontal, 24);
    bar.set_halign(gtk::Align::Center);
    bar.add_css_class("stats-bar");

    let (attempts, matches) = {
        let st = state.borrow();
        (st.controller.attempts(), st.controller.matches())
    };

    let attempts_label = gtk::Label::builder()
        .label(attempts_text(attempts))
        .css_classes(vec!["stats-label", "numeric"])
        .build();
    let matches_label = gtk::Label::builder()
        .label(matches_text(matches))
        .css_classes(vec!["stats-label", "numeric"])
        .build();

    bar.append(&attempts_label);
    bar.append(&matches_label);

    let mut st = state.borrow_mut();
    st.attempts_label = Some(attempts_label);
    st.matches_label = Some(matches_label);

    bar
}

pub(super) fn build_controls_bar(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let bar = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    bar.set_halign(gtk::Align::Center);
    bar.add_css_class("controls-bar");

    let continue_button = gtk::Button::with_label("Continue");
    continue_button.add_css_class("suggested-action");
    continue_button.add_css_class("pill");
    continue_button.set_sensitive(state.borrow().controller.continue_enabled());
    continue_button.connect_clicked({
        let state = state.clone();
        move |_| dispatch(&state, Input::ContinueClicked)
    });

    let exit_button = gtk::Button::with_label("Exit");
    exit_button.add_css_class("pill");
    exit_button.connect_clicked({
        let state = state.clone();
        move |_| dispatch(&state, Input::ExitClicked)
    });

    bar.append(&continue_button);
    bar.append(&exit_button);

    state.borrow_mut().continue_button = Some(continue_button);

    bar
}

pub(super) fn update_stats(st: &AppState, attempts: u32, matches: u32) {
    if let Some(label) = &st.attempts_label {
        label.set_text(&attempts_text(attempts));
    }
    if let Some(label) = &st.matches_label {
        label.set_text(&matches_text(matches));
    }
}

pub(super) fn set_continue_enabled(st: &AppState, enabled: bool) {
    if let Some(button) = &st.continue_button {
        button.set_sensitive(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_text() {
        assert_eq!(attempts_text(0), "Attempts: 0");
        assert_eq!(matches_text(7), "Matches: 7");
    }
}
