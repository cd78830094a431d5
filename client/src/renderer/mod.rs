mod backend;

use std::sync::{Arc, Mutex, RwLock};

use liblife::{CellState, LifeGrid};
use rand::Rng;
use winit::{
    event::{ElementState, MouseButton, WindowEvent},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
};

use backend::{Renderer, frame::RenderFrame, window::RendererWindowConfig};

use crate::{
    Config, State, ticker,
    view::{CellShape, Viewport},
};

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];
const GRID_LINE: [u8; 4] = [40, 40, 40, 255];

/// Radius of the shift-click splash, in cells.
const SPLASH_RADIUS_CELLS: u32 = 5;
/// Percentage of the splash area that gets toggled.
const SPLASH_FACTOR: f64 = 1.0;

pub fn run(state_arc: Arc<RwLock<State>>, config: Config) -> anyhow::Result<()> {
    let renderer_state = RendererState {
        global_state: state_arc,
        width: config.window_width,
        height: config.window_height,
        mouse_pos: (0.0, 0.0),
        mouse_pressed: false,
        pan_anchor: (0.0, 0.0),
        anchor_cell: CellState::Empty,
        last_edited_cell: None,
        modifiers: ModifiersState::empty(),
    };

    let renderer_state_arc = Arc::new(Mutex::new(renderer_state));
    let draw_state_arc = renderer_state_arc.clone();
    let event_state_arc = renderer_state_arc.clone();
    let resize_state_arc = renderer_state_arc.clone();

    let renderer = Renderer::new(RendererWindowConfig {
        title: "Game of Life".to_owned(),
        width: config.window_width,
        height: config.window_height,
        target_fps: config.target_fps,
        draw_callback: Box::new(move |frame| {
            let mut state = draw_state_arc.lock().unwrap();
            draw(&mut state, frame);
        }),
        event_callback: Box::new(move |event| {
            let mut state = event_state_arc.lock().unwrap();
            on_event(&mut state, event);
        }),
        resize_callback: Box::new(move |width, height| {
            let mut state = resize_state_arc.lock().unwrap();
            on_resize(&mut state, width, height);
        }),
    })?;

    renderer.run()
}

fn draw(state: &mut RendererState, mut frame: RenderFrame) {
    state.width = frame.width;
    state.height = frame.height;

    let global_state = state.global_state.read().unwrap();
    let view = global_state.viewport;
    let cell_size = view.cell_size;
    let color = global_state.colors.current();
    let (x_delta_cells, y_delta_cells) = view.delta_cells();

    frame.fill(BACKGROUND);

    for x in (0..frame.width).step_by(cell_size as usize) {
        frame.vline(x, GRID_LINE);
    }
    for y in (0..frame.height).step_by(cell_size as usize) {
        frame.hline(y, GRID_LINE);
    }

    // Only the visible cell window; the right and bottom fringes may read
    // past the field, which the grid normalizes to empty.
    for x in 0..frame.width.div_ceil(cell_size) {
        for y in 0..frame.height.div_ceil(cell_size) {
            let cell = global_state
                .life
                .get_cell(x as i32 + x_delta_cells, y as i32 + y_delta_cells);

            if cell != CellState::Alive {
                continue;
            }

            let (screen_x, screen_y) = (x * cell_size, y * cell_size);
            match global_state.shape {
                CellShape::Square => {
                    frame.draw_square(screen_x, screen_y, cell_size, cell_size, color)
                }
                CellShape::Round => frame.draw_disc(screen_x, screen_y, cell_size, color),
            }
        }
    }
}

fn on_resize(state: &mut RendererState, width: u32, height: u32) {
    state.width = width;
    state.height = height;

    let mut global_state = state.global_state.write().unwrap();
    let cell_size = global_state.viewport.cell_size;

    // Grow-only: shrinking the window never loses drawn patterns.
    global_state
        .life
        .resize((width / cell_size) as usize, (height / cell_size) as usize);

    let grid_cells = (global_state.life.width(), global_state.life.height());
    global_state.viewport.clamp_pan(grid_cells, (width, height));
}

fn on_event(state: &mut RendererState, event: &WindowEvent) {
    match event {
        WindowEvent::ModifiersChanged(modifiers) => {
            state.modifiers = modifiers.state();
        }
        WindowEvent::KeyboardInput { event, .. } => {
            if event.state == ElementState::Pressed
                && !event.repeat
                && let PhysicalKey::Code(code) = event.physical_key
            {
                on_key(state, code);
            }
        }
        WindowEvent::MouseInput {
            state: button_state,
            button: MouseButton::Left,
            ..
        } => match button_state {
            ElementState::Pressed => on_mouse_pressed(state),
            ElementState::Released => {
                state.mouse_pressed = false;
                state.last_edited_cell = None;
            }
        },
        WindowEvent::CursorMoved { position, .. } => {
            state.mouse_pos = (position.x, position.y);
            if state.mouse_pressed {
                on_mouse_drag(state);
            }
        }
        _ => {}
    }
}

fn on_key(state: &mut RendererState, code: KeyCode) {
    let mut global_state = state.global_state.write().unwrap();

    match code {
        KeyCode::Space => {
            global_state.paused = !global_state.paused;
            if global_state.paused {
                tracing::info!("Paused");
            } else {
                tracing::info!("Resumed");
            }
        }
        KeyCode::ArrowRight => {
            global_state.interval_ms = ticker::adjust_interval(
                global_state.interval_ms,
                -(ticker::INTERVAL_STEP_MS as i64),
            );
            tracing::info!("Interval reduced {}", global_state.interval_ms);
        }
        KeyCode::ArrowLeft => {
            global_state.interval_ms =
                ticker::adjust_interval(global_state.interval_ms, ticker::INTERVAL_STEP_MS as i64);
            tracing::info!("Interval increased {}", global_state.interval_ms);
        }
        KeyCode::ArrowUp => {
            if global_state.viewport.adjust_cell_size(1) {
                let grid_cells = (global_state.life.width(), global_state.life.height());
                global_state
                    .viewport
                    .clamp_pan(grid_cells, (state.width, state.height));
            }
            tracing::info!("Cell size increased {}", global_state.viewport.cell_size);
        }
        KeyCode::ArrowDown => {
            if global_state.viewport.adjust_cell_size(-1) {
                // Smaller cells expose more of the viewport; grow the grid
                // to cover it.
                let cell_size = global_state.viewport.cell_size;
                global_state.life.resize(
                    (state.width / cell_size) as usize,
                    (state.height / cell_size) as usize,
                );

                let grid_cells = (global_state.life.width(), global_state.life.height());
                global_state
                    .viewport
                    .clamp_pan(grid_cells, (state.width, state.height));
            }
            tracing::info!("Cell size decreased {}", global_state.viewport.cell_size);
        }
        KeyCode::KeyQ => {
            if state.modifiers.shift_key() {
                global_state.colors.back();
            } else {
                global_state.colors.forward();
            }
        }
        KeyCode::KeyW => {
            global_state.shape = global_state.shape.toggled();
        }
        KeyCode::KeyL if state.modifiers.control_key() => {
            global_state.life.clear();
            tracing::info!("Cleared");
        }
        _ => {}
    }
}

fn on_mouse_pressed(state: &mut RendererState) {
    state.mouse_pressed = true;

    let (px, py) = state.mouse_pos;
    let modifiers = state.modifiers;

    let mut global_state = state.global_state.write().unwrap();
    let view = global_state.viewport;
    let (cell_x, cell_y) = view.cell_under(px, py);

    state.anchor_cell = global_state.life.get_cell(cell_x, cell_y);
    state.pan_anchor = (px + view.x_delta, py + view.y_delta);

    if modifiers.control_key() {
        // Pan anchor recorded above; the drag does the moving.
    } else if modifiers.shift_key() {
        splash(
            &mut global_state.life,
            view,
            state.anchor_cell,
            (px, py),
            (state.width, state.height),
        );
    } else {
        edit_cell(&mut global_state.life, state.anchor_cell, cell_x, cell_y);
        state.last_edited_cell = Some((cell_x, cell_y));
    }
}

fn on_mouse_drag(state: &mut RendererState) {
    let (px, py) = state.mouse_pos;
    let modifiers = state.modifiers;

    let mut global_state = state.global_state.write().unwrap();

    if modifiers.control_key() {
        let (anchor_x, anchor_y) = state.pan_anchor;
        let grid_cells = (global_state.life.width(), global_state.life.height());

        global_state.viewport.pan_to(
            anchor_x - px,
            anchor_y - py,
            grid_cells,
            (state.width, state.height),
        );
        return;
    }

    let view = global_state.viewport;
    let (cell_x, cell_y) = view.cell_under(px, py);

    if modifiers.shift_key() {
        splash(
            &mut global_state.life,
            view,
            state.anchor_cell,
            (px, py),
            (state.width, state.height),
        );
    } else if state.last_edited_cell != Some((cell_x, cell_y)) {
        edit_cell(&mut global_state.life, state.anchor_cell, cell_x, cell_y);
        state.last_edited_cell = Some((cell_x, cell_y));
    }
}

/// Place the opposite of the cell recorded at mouse-press time. If the pixel
/// math overshot the field, clamp back in and retry.
fn edit_cell(life: &mut LifeGrid, anchor_cell: CellState, x: i32, y: i32) {
    if life.width() == 0 || life.height() == 0 {
        return;
    }

    let next = if anchor_cell == CellState::Empty {
        CellState::Alive
    } else {
        CellState::Empty
    };

    if let Err(err) = life.place(x, y, next) {
        tracing::debug!("{err}; clamping");

        let x = x.clamp(0, life.width() as i32 - 1);
        let y = y.clamp(0, life.height() as i32 - 1);
        life.place(x, y, next)
            .expect("Placing at clamped coordinates");
    }
}

/// Randomized splash around the cursor: toggles a percentage of the cells in
/// a radius box clamped to the window.
fn splash(
    life: &mut LifeGrid,
    view: Viewport,
    anchor_cell: CellState,
    mouse: (f64, f64),
    window: (u32, u32),
) {
    let rng = &mut rand::rng();
    let radius = (SPLASH_RADIUS_CELLS * view.cell_size) as f64;

    let left = (mouse.0 - radius).max(0.0);
    let top = (mouse.1 - radius).max(0.0);
    let right = (mouse.0 + radius).min(window.0 as f64);
    let bottom = (mouse.1 + radius).min(window.1 as f64);

    let cell_size = view.cell_size as f64;
    let amount = (right - left) / cell_size * (bottom - top) / cell_size / 100.0 * SPLASH_FACTOR;

    for _ in 0..=amount as usize {
        let px = left + rng.random_range(0.0..(right - left).max(1.0));
        let py = top + rng.random_range(0.0..(bottom - top).max(1.0));

        let (cell_x, cell_y) = view.cell_under(px, py);
        edit_cell(life, anchor_cell, cell_x, cell_y);
    }
}

struct RendererState {
    global_state: Arc<RwLock<State>>,
    width: u32,
    height: u32,
    mouse_pos: (f64, f64),
    mouse_pressed: bool,
    /// Grid-space pixel position of the last mouse press, for panning.
    pan_anchor: (f64, f64),
    /// State of the cell under the last mouse press; edits place its
    /// opposite for the whole drag.
    anchor_cell: CellState,
    last_edited_cell: Option<(i32, i32)>,
    modifiers: ModifiersState,
}
