use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use super::app::dispatch;
use super::state::AppState;
use crate::game::Input;

pub const CONTENT_MARGIN: i32 = 12;
pub const TILE_GAP: i32 = 6;
const CARD_BACK: &str = "?";

pub(super) fn redraw_button_child(button: &gtk::Button) {
    if let Some(child) = button.child() {
        child.queue_draw();
    }
}

/// Brings one button in line with its card: classes, sensitivity and face.
pub(super) fn sync_card(st: &AppState, index: usize) {
    let (Some(button), Some(card)) = (st.grid_buttons.get(index), st.controller.card(index)) else {
        return;
    };
    let revealed = card.is_revealed();
    let matched = st.is_matched(index);

    button.remove_css_class("active");
    button.remove_css_class("matched");
    if matched {
        button.add_css_class("matched");
    } else if revealed {
        button.add_css_class("active");
    }
    // Face-up cards take no clicks until they are hidden again.
    button.set_sensitive(!revealed);
    redraw_button_child(button);
}

pub(super) fn sync_board(st: &AppState) {
    for index in 0..st.grid_buttons.len() {
        sync_card(st, index);
    }
}

const FACE_FONT: &str = "Noto Color Emoji, Noto Sans, sans";

/// Centers `text` in the area, sized as a fraction of the shorter side.
fn draw_card_face(
    area: &gtk::DrawingArea,
    cr: &cairo::Context,
    width: i32,
    height: i32,
    text: &str,
    scale: f64,
) {
    let (width, height) = (f64::from(width), f64::from(height));

    let mut font = pango::FontDescription::from_string(FACE_FONT);
    font.set_absolute_size(width.min(height) * scale * f64::from(pango::SCALE));

    let layout = pangocairo::functions::create_layout(cr);
    layout.set_font_description(Some(&font));
    layout.set_text(text);

    let color = area.style_context().color();
    cr.set_source_rgba(
        f64::from(color.red()),
        f64::from(color.green()),
        f64::from(color.blue()),
        f64::from(color.alpha()),
    );

    let (text_width, text_height) = layout.pixel_size();
    cr.move_to(
        (width - f64::from(text_width)) / 2.0,
        (height - f64::from(text_height)) / 2.0,
    );
    pangocairo::functions::show_layout(cr, &layout);
}

pub fn build_board_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("memory-board");
    grid.set_row_spacing(TILE_GAP as u32);
    grid.set_column_spacing(TILE_GAP as u32);
    grid.set_row_homogeneous(true);
    grid.set_column_homogeneous(true);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);

    let (css_provider, card_count, grid_cols, grid_rows) = {
        let st = state.borrow();
        let board = st.controller.board();
        (
            st.dynamic_css_provider.clone(),
            board.len(),
            board.columns() as i32,
            board.rows() as i32,
        )
    };

    let update_styles = move |grid: &gtk::Grid| {
        let width = grid.width();
        let height = grid.height();
        if width > 0 && height > 0 {
            let cell_width = (width - (grid_cols - 1) * TILE_GAP) / grid_cols;
            let cell_height = (height - (grid_rows - 1) * TILE_GAP) / grid_rows;
            let card_radius = (cell_width.min(cell_height) as f64 * 0.15) as i32;

            if let Some(provider) = &css_provider {
                provider.load_from_data(&format!(
                    ".memory-card {{ border-radius: {card_radius}px; }}"
                ));
            }
        }
    };

    let update_styles_clone = update_styles.clone();
    grid.connect_closure(
        "notify::width",
        false,
        glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
            update_styles_clone(&grid);
        }),
    );
    grid.connect_closure(
        "notify::height",
        false,
        glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
            update_styles(&grid);
        }),
    );

    let mut buttons = Vec::with_capacity(card_count);

    for index in 0..card_count {
        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder()
            .css_classes(vec!["memory-card"])
            .hexpand(true)
            .vexpand(true)
            .build();

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        drawing_area.add_css_class("memory-card-label");

        let state_draw = state.clone();
        drawing_area.set_draw_func(move |area, cr, width, height| {
            let st = state_draw.borrow();
            let Some(card) = st.controller.card(index) else {
                return;
            };
            let (text, scale) = if card.is_revealed() {
                (card.identity().face.as_str(), 0.46)
            } else {
                (CARD_BACK, 0.34)
            };
            draw_card_face(area, cr, width, height, text, scale);
        });

        button.set_child(Some(&drawing_area));

        let state_click = state.clone();
        button.connect_clicked(move |_| {
            dispatch(&state_click, Input::CardClicked(index));
        });

        aspect_frame.set_child(Some(&button));

        let x = index as i32 % grid_cols;
        let y = index as i32 / grid_cols;
        grid.attach(&aspect_frame, x, y, 1, 1);
        buttons.push(button);
    }

    {
        let mut st = state.borrow_mut();
        st.grid_buttons = buttons;
        sync_board(&st);
    }

    grid
}
