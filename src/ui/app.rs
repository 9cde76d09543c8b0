use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use adw::prelude::*;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::prelude::*;
use libadwaita as adw;

use super::board::{CONTENT_MARGIN, build_board_grid, sync_board, sync_card};
use super::dialogs::{
    show_about_dialog, show_exit_dialog, show_instructions_dialog, show_score_dialog,
};
use super::hud::{build_controls_bar, build_stats_bar, set_continue_enabled, update_stats};
use super::state::AppState;
use crate::config::{debug_mode_enabled, load_config};
use crate::game::{Effect, GameController, Input, Phase, Score};

const APP_ID: &str = "io.github.memorymatch.MemoryMatch";
const RESOURCE_PREFIX: &str = "/io/github/memorymatch/MemoryMatch";

static GLIB_LOGGER: glib::GlibLogger = glib::GlibLogger::new(
    glib::GlibLoggerFormat::Plain,
    glib::GlibLoggerDomain::CrateTarget,
);

fn init_logging() {
    if log::set_logger(&GLIB_LOGGER).is_ok() {
        log::set_max_level(if debug_mode_enabled() {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        });
    }
}

/// Feeds one input to the controller and renders what came out of it.
pub(super) fn dispatch(state: &Rc<RefCell<AppState>>, input: Input) {
    let effects = state.borrow_mut().controller.handle(input);
    if !effects.is_empty() {
        apply_effects(state, effects);
    }
}

fn apply_effects(state: &Rc<RefCell<AppState>>, effects: Vec<Effect>) {
    let mut confirm_exit = false;
    let mut score: Option<Score> = None;
    let mut quit = false;

    {
        let st = state.borrow();
        for effect in effects {
            match effect {
                Effect::Reveal(index) | Effect::Hide(index) => sync_card(&st, index),
                Effect::Stats { attempts, matches } => {
                    update_stats(&st, attempts, matches);
                    sync_board(&st);
                }
                Effect::ContinueEnabled(enabled) => set_continue_enabled(&st, enabled),
                Effect::Redeal => sync_board(&st),
                Effect::ConfirmExit => confirm_exit = true,
                Effect::ShowScore(value) => score = Some(value),
                Effect::Quit => quit = true,
            }
        }
    }

    let window = state.borrow().window.clone();

    if confirm_exit {
        let state_answer = state.clone();
        show_exit_dialog(window.as_ref(), move |confirmed| {
            dispatch(&state_answer, Input::ExitAnswered(confirmed));
        });
    }

    match (score, quit) {
        (Some(score), true) => {
            let window_close = window.clone();
            show_score_dialog(window.as_ref(), score, move || {
                if let Some(window) = &window_close {
                    window.close();
                }
            });
        }
        (Some(score), false) => {
            show_score_dialog(window.as_ref(), score, || {});
        }
        (None, true) => {
            if let Some(window) = &window {
                window.close();
            }
        }
        (None, false) => {}
    }
}

pub fn run() -> glib::ExitCode {
    init_logging();

    let config = load_config();
    let controller = match GameController::new(&config.deck, config.columns) {
        Ok(controller) => controller,
        Err(err) => {
            log::error!("{err}");
            return glib::ExitCode::FAILURE;
        }
    };
    let pending_controller = RefCell::new(Some(controller));

    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        if let Some(window) = app.active_window() {
            window.present();
            return;
        }
        let Some(controller) = pending_controller.borrow_mut().take() else {
            return;
        };

        load_css();

        let state = Rc::new(RefCell::new(AppState::new(controller)));

        let new_game_action = SimpleAction::new("new-game", None);
        new_game_action.connect_activate({
            let state = state.clone();
            move |_, _| dispatch(&state, Input::NewGame)
        });
        app.add_action(&new_game_action);

        let exit_action = SimpleAction::new("exit", None);
        exit_action.connect_activate({
            let state = state.clone();
            move |_, _| dispatch(&state, Input::ExitClicked)
        });
        app.add_action(&exit_action);

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let state = state.clone();
            move |_, _| {
                let window = state.borrow().window.clone();
                show_instructions_dialog(window.as_ref());
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let state = state.clone();
            move |_, _| {
                let window = state.borrow().window.clone();
                show_about_dialog(window.as_ref());
            }
        });
        app.add_action(&about_action);

        app.set_accels_for_action("app.new-game", &["<Control>n"]);
        app.set_accels_for_action("app.exit", &["<Control>q"]);

        let dynamic_css_provider = gtk::CssProvider::new();
        if let Some(display) = gtk::gdk::Display::default() {
            gtk::style_context_add_provider_for_display(
                &display,
                &dynamic_css_provider,
                gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
        }
        state.borrow_mut().dynamic_css_provider = Some(dynamic_css_provider);

        let title = gtk::Label::new(None);
        title.set_markup("<b>Memory Match</b>");
        title.set_halign(gtk::Align::Center);

        let header = adw::HeaderBar::builder().title_widget(&title).build();
        header.add_css_class("app-header");
        header.add_css_class("flat");

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .action_name("app.new-game")
            .build();
        restart_button.set_tooltip_text(Some("New Game"));
        header.pack_start(&restart_button);

        let menu_model = gio::Menu::new();
        menu_model.append(Some("New Game"), Some("app.new-game"));
        menu_model.append(Some("Instructions"), Some("app.instructions"));
        menu_model.append(Some("About Memory Match"), Some("app.about"));
        menu_model.append(Some("Exit"), Some("app.exit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();
        header.pack_end(&menu_button);

        let game_view = build_game_view(&state);

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&game_view));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Memory Match")
            .default_width(520)
            .default_height(620)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 480);
        win.add_css_class("app-window");

        // Closing the window is the same as pressing Exit.
        win.connect_close_request({
            let state = state.clone();
            move |_| {
                if state.borrow().controller.phase() == Phase::Exited {
                    return glib::Propagation::Proceed;
                }
                dispatch(&state, Input::ExitClicked);
                glib::Propagation::Stop
            }
        });

        state.borrow_mut().window = Some(win.clone());
        log::debug!("window ready");
        win.present();
    });

    app.run()
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        gio::resources_register_include!("memory-match.gresource")
            .expect("failed to register embedded resources");
    });

    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_resource(&format!("{RESOURCE_PREFIX}/style.css"));
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");
    root.set_margin_top(CONTENT_MARGIN);
    root.set_margin_bottom(CONTENT_MARGIN);
    root.set_margin_start(CONTENT_MARGIN);
    root.set_margin_end(CONTENT_MARGIN);

    root.append(&build_stats_bar(state));

    let board_grid = build_board_grid(state);

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Fill);
    board_card.set_valign(gtk::Align::Fill);
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);
    board_card.add_css_class("memory-board-container");

    let (grid_cols, grid_rows) = {
        let st = state.borrow();
        let board = st.controller.board();
        (board.columns() as f32, board.rows() as f32)
    };
    let grid_ratio = if grid_rows > 0.0 { grid_cols / grid_rows } else { 1.0 };
    let grid_frame = gtk::AspectFrame::new(0.5, 0.5, grid_ratio, false);
    grid_frame.set_halign(gtk::Align::Fill);
    grid_frame.set_valign(gtk::Align::Fill);
    grid_frame.set_hexpand(true);
    grid_frame.set_vexpand(true);
    grid_frame.set_child(Some(&board_grid));
    board_card.append(&grid_frame);
    root.append(&board_card);

    root.append(&build_controls_bar(state));

    root
}
