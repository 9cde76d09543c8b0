use gtk4 as gtk;
use libadwaita as adw;

use crate::game::GameController;

/// Everything the window needs between signal handlers.
pub struct AppState {
    pub window: Option<adw::ApplicationWindow>,
    pub attempts_label: Option<gtk::Label>,
    pub matches_label: Option<gtk::Label>,
    pub continue_button: Option<gtk::Button>,
    pub dynamic_css_provider: Option<gtk::CssProvider>,
    pub grid_buttons: Vec<gtk::Button>,
    pub controller: GameController,
}

impl AppState {
    pub fn new(controller: GameController) -> Self {
        AppState {
            window: None,
            attempts_label: None,
            matches_label: None,
            continue_button: None,
            dynamic_css_provider: None,
            grid_buttons: Vec::new(),
            controller,
        }
    }

    /// A revealed card that is not part of the pending selection has been matched.
    pub fn is_matched(&self, index: usize) -> bool {
        let Some(card) = self.controller.card(index) else {
            return false;
        };
        let (first, second) = self.controller.selection();
        card.is_revealed() && first != Some(index) && second != Some(index)
    }
}
