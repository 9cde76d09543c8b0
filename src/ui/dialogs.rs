use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

use crate::game::Score;

pub const EXIT_PROMPT: &str = "Are you sure you want to end the game?";

pub fn show_instructions_dialog(parent: Option<&impl IsA<gtk::Widget>>) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some("Instructions"),
        Some(
            "Flip two cards per turn and find the matching pairs.\n\
Matched pairs stay face-up.\n\
After a miss, press Continue to turn both cards back over.",
        ),
    );
    dialog.add_response("ok", "Got it");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(parent);
    dialog
}

pub fn show_about_dialog(parent: Option<&impl IsA<gtk::Widget>>) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Memory Match")
        .application_icon("applications-games-symbolic")
        .version(env!("CARGO_PKG_VERSION"))
        .comments("A memory game for finding pairs.")
        .license_type(gtk::License::MitX11)
        .build();
    dialog.present(parent);
    dialog
}

/// Asks before leaving. `on_answer` gets `true` only for an explicit yes.
pub fn show_exit_dialog(
    parent: Option<&impl IsA<gtk::Widget>>,
    on_answer: impl Fn(bool) + 'static,
) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(Some("End Game?"), Some(EXIT_PROMPT));
    dialog.add_response("no", "No");
    dialog.add_response("yes", "Yes");
    dialog.set_response_appearance("yes", adw::ResponseAppearance::Destructive);
    dialog.set_default_response(Some("no"));
    dialog.set_close_response("no");
    dialog.connect_response(None, move |_, response| {
        on_answer(response == "yes");
    });
    dialog.present(parent);
    dialog
}

pub fn show_score_dialog(
    parent: Option<&impl IsA<gtk::Widget>>,
    score: Score,
    on_closed: impl Fn() + 'static,
) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(Some("Game Over"), Some(&score.to_string()));
    dialog.add_response("ok", "OK");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.connect_closed(move |_| on_closed());
    dialog.present(parent);
    dialog
}
