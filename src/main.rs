//! Plank Catch entry point
//!
//! Browser: wires the canvas, pointer/touch listeners, the animation-frame
//! chain and the one-second countdown to the game loop.
//! Native: plays a seeded headless session with an auto-tracking plank.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent,
    };

    use plank_catch::platform::{
        FrameSnapshot, Navigator, POINTER_EVENT_TYPES, PointerEvent, PointerPhase, RenderSurface,
        ResultSink, client_point, dispatch,
    };
    use plank_catch::sim::{AttemptResult, Bounds, MatchPhase, NavigationSignal};
    use plank_catch::{FrameStatus, GameConfig, GameEvent, GameLoop, RetryAction, ScoreBoard};

    const BACKGROUND_COLOR: &str = "#0b1026";
    const BALL_COLOR: &str = "#ffd54a";
    const PLANK_COLOR: &str = "#8d6e63";
    const HUD_COLOR: &str = "#ffffff";

    /// Canvas 2D rendering collaborator
    struct CanvasSurface {
        canvas: HtmlCanvasElement,
        context: Option<CanvasRenderingContext2d>,
    }

    impl CanvasSurface {
        fn new(canvas: HtmlCanvasElement) -> Self {
            let context = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
            Self { canvas, context }
        }

        /// Match the canvas to the window and report the new size
        fn fit_to_window(&self) -> Option<Bounds> {
            let window = web_sys::window()?;
            let width = window.inner_width().ok()?.as_f64()? as u32;
            let height = window.inner_height().ok()?.as_f64()? as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            log::info!("Canvas size: {}x{}", width, height);
            Some(Bounds::new(width as f32, height as f32))
        }
    }

    impl RenderSurface for CanvasSurface {
        fn bounds(&self) -> Option<Bounds> {
            self.context.as_ref()?;
            Some(Bounds::new(
                self.canvas.width() as f32,
                self.canvas.height() as f32,
            ))
        }

        fn draw(&mut self, frame: &FrameSnapshot<'_>) {
            let Some(ctx) = self.context.as_ref() else {
                return;
            };
            let w = frame.bounds.width as f64;
            let h = frame.bounds.height as f64;

            ctx.set_fill_style_str(BACKGROUND_COLOR);
            ctx.fill_rect(0.0, 0.0, w, h);

            ctx.set_fill_style_str(BALL_COLOR);
            for entity in frame.entities {
                let p = entity.position();
                ctx.begin_path();
                let _ = ctx.arc(
                    p.x as f64,
                    p.y as f64,
                    entity.radius() as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }

            if frame.phase == MatchPhase::Running {
                let (min, max) = frame.paddle.rect();
                ctx.set_fill_style_str(PLANK_COLOR);
                ctx.fill_rect(
                    min.x as f64,
                    min.y as f64,
                    (max.x - min.x) as f64,
                    (max.y - min.y) as f64,
                );
            }

            ctx.set_fill_style_str(HUD_COLOR);
            ctx.set_font("20px sans-serif");
            let _ = ctx.fill_text(&format!("Score {}", frame.score), 16.0, 32.0);
            let _ = ctx.fill_text(&format!("Time {}", frame.time_left), 16.0, 58.0);
            let _ = ctx.fill_text(
                &format!("Attempts {}", frame.attempts_remaining),
                16.0,
                84.0,
            );
        }
    }

    /// Event listener that unregisters itself when dropped
    struct Listener {
        target: EventTarget,
        event_type: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self.target.remove_event_listener_with_callback(
                self.event_type,
                self.closure.as_ref().unchecked_ref(),
            );
        }
    }

    fn listen(
        target: &EventTarget,
        event_type: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Listener, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        Ok(Listener {
            target: target.clone(),
            event_type,
            closure,
        })
    }

    /// Everything the browser callbacks share
    struct App {
        game: GameLoop,
        surface: CanvasSurface,
        scores: ScoreBoard,
        /// Attached only while an attempt accepts input
        pointer_listeners: Vec<Listener>,
        listeners: Vec<Listener>,
        countdown: Option<(i32, Closure<dyn FnMut()>)>,
    }

    /// Shows the end-of-attempt modal and records the result
    struct EndScreen<'a> {
        scores: &'a mut ScoreBoard,
    }

    impl ResultSink for EndScreen<'_> {
        fn attempt_ended(&mut self, result: &AttemptResult) {
            self.scores.attempt_ended(result);
            set_modal_visible(true);
            if let Some(el) = document().and_then(|d| d.get_element_by_id("modal-attempts")) {
                el.set_text_content(Some(&result.attempts_remaining.to_string()));
            }
            if let Some(el) = document().and_then(|d| d.get_element_by_id("modal-score")) {
                el.set_text_content(Some(&result.score.to_string()));
            }
        }
    }

    struct BrowserNavigator;

    impl Navigator for BrowserNavigator {
        fn navigate(&mut self, signal: NavigationSignal) {
            log::info!("Leaving game: {:?}", signal);
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/");
            }
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_modal_visible(visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id("modal-end")) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Client point of a mouse or touch event
    fn event_client_point(event: &Event) -> Vec2 {
        if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
            let to_vec = |t: web_sys::Touch| Vec2::new(t.client_x() as f32, t.client_y() as f32);
            let changed = touch_event.changed_touches().get(0).map(to_vec);
            let touch = touch_event.touches().get(0).map(to_vec);
            return client_point(changed, touch, None);
        }
        let mouse = event
            .dyn_ref::<MouseEvent>()
            .map(|m| Vec2::new(m.client_x() as f32, m.client_y() as f32));
        client_point(None, None, mouse)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Plank Catch starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;
        let surface = CanvasSurface::new(canvas);
        surface.fit_to_window();

        let seed = js_sys::Date::now() as u64;
        let mut game = GameLoop::new(GameConfig::load(), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.start(&surface)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            surface,
            scores: ScoreBoard::load(),
            pointer_listeners: Vec::new(),
            listeners: Vec::new(),
            countdown: None,
        }));
        set_modal_visible(false);

        let mut listeners = Vec::new();
        let window_target: &EventTarget = window.as_ref();

        {
            let app = app.clone();
            listeners.push(listen(window_target, "resize", move |_event: Event| {
                let mut app = app.borrow_mut();
                if let Some(bounds) = app.surface.fit_to_window() {
                    app.game.resize(bounds);
                }
            })?);
        }

        if let Some(btn) = document.get_element_by_id("play-again") {
            let app = app.clone();
            listeners.push(listen(btn.as_ref(), "click", move |_event: Event| {
                let action = app.borrow_mut().game.retry();
                if let RetryAction::Restarted { request_frame: needs_frame } = action {
                    set_modal_visible(false);
                    if needs_frame {
                        request_frame(app.clone());
                    }
                }
                flush_events(&app);
            })?);
        }

        if let Some(btn) = document.get_element_by_id("back-home") {
            let app = app.clone();
            listeners.push(listen(btn.as_ref(), "click", move |_event: Event| {
                app.borrow_mut().game.back_to_home();
                flush_events(&app);
            })?);
        }

        let countdown = {
            let app = app.clone();
            Closure::<dyn FnMut()>::new(move || {
                app.borrow_mut().game.second();
                flush_events(&app);
            })
        };
        let interval_id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            countdown.as_ref().unchecked_ref(),
            1000,
        )?;

        {
            let mut a = app.borrow_mut();
            a.listeners = listeners;
            a.countdown = Some((interval_id, countdown));
        }

        sync_pointer_listeners(&app);
        request_frame(app);

        log::info!("Plank Catch running!");
        Ok(())
    }

    fn attach_pointer_listeners(app: &Rc<RefCell<App>>) -> Result<Vec<Listener>, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let window_target: &EventTarget = window.as_ref();
        let mut listeners = Vec::with_capacity(POINTER_EVENT_TYPES.len());

        for event_type in POINTER_EVENT_TYPES {
            let Some(phase) = PointerPhase::from_event_type(event_type) else {
                continue;
            };
            let app = app.clone();
            listeners.push(listen(window_target, event_type, move |event: Event| {
                let client = event_client_point(&event);
                let mut app = app.borrow_mut();
                let rect = app.surface.canvas.get_bounding_client_rect();
                let origin = Vec2::new(rect.left() as f32, rect.top() as f32);
                let command = PointerEvent::from_client(phase, client, origin).to_command();
                app.game.handle_input(command);
            })?);
        }
        Ok(listeners)
    }

    /// Attach pointer listeners while an attempt is in play, drop them otherwise.
    ///
    /// Never called from a pointer listener, so dropping them here is safe.
    fn sync_pointer_listeners(app: &Rc<RefCell<App>>) {
        let (wanted, attached) = {
            let a = app.borrow();
            (a.game.accepts_input(), !a.pointer_listeners.is_empty())
        };
        if wanted && !attached {
            match attach_pointer_listeners(app) {
                Ok(listeners) => app.borrow_mut().pointer_listeners = listeners,
                Err(e) => log::warn!("Failed to attach pointer listeners: {:?}", e),
            }
        } else if !wanted && attached {
            let detached = std::mem::take(&mut app.borrow_mut().pointer_listeners);
            drop(detached);
            log::debug!("Pointer listeners removed");
        }
    }

    fn request_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move |_time: f64| on_frame(app));
        let _ = window.request_animation_frame(callback.unchecked_ref());
    }

    fn on_frame(app: Rc<RefCell<App>>) {
        let status = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            a.game.frame(&mut a.surface)
        };
        flush_events(&app);
        if status == FrameStatus::Continue {
            request_frame(app);
        }
    }

    /// Deliver queued game events; tears the page down on navigation
    fn flush_events(app: &Rc<RefCell<App>>) {
        let events = app.borrow_mut().game.drain_events();
        if events.is_empty() {
            sync_pointer_listeners(app);
            return;
        }
        let navigating = events.iter().any(|e| matches!(e, GameEvent::Navigate(_)));
        {
            let mut a = app.borrow_mut();
            let mut end_screen = EndScreen {
                scores: &mut a.scores,
            };
            dispatch(events, &mut BrowserNavigator, &mut end_screen);
        }
        if navigating {
            teardown(app);
        } else {
            sync_pointer_listeners(app);
        }
    }

    /// Stop the loop, clear the countdown and unregister every listener.
    ///
    /// Closures are dropped on a later task: the caller may be one of them.
    fn teardown(app: &Rc<RefCell<App>>) {
        let (listeners, countdown) = {
            let mut a = app.borrow_mut();
            a.game.stop();
            let mut listeners = std::mem::take(&mut a.listeners);
            listeners.append(&mut a.pointer_listeners);
            (listeners, a.countdown.take())
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some((id, _)) = &countdown {
            window.clear_interval_with_handle(*id);
        }
        let deferred = Closure::once_into_js(move || {
            drop(listeners);
            drop(countdown);
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(deferred.unchecked_ref(), 0);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Plank Catch (native) starting...");
    log::info!("Native mode plays a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    match demo::play_session(seed) {
        Ok(board) => {
            println!("\nSession finished (seed {seed})");
            for (i, entry) in board.entries.iter().enumerate() {
                println!(
                    "  #{}: score {} (caught {}, missed {})",
                    i + 1,
                    entry.score,
                    entry.caught,
                    entry.missed
                );
            }
        }
        Err(e) => {
            log::error!("Demo failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use plank_catch::consts::FRAME_RATE;
    use plank_catch::platform::{HeadlessSurface, RecordingNavigator, dispatch};
    use plank_catch::sim::{Bounds, PaddleCommand};
    use plank_catch::{FrameStatus, GameConfig, GameError, GameLoop, RetryAction, ScoreBoard};

    /// Furthest the demo plank moves per frame (pixels)
    const STEER_SPEED: f32 = 9.0;

    /// Play every attempt of a session, steering the plank under the lowest ball
    pub fn play_session(seed: u64) -> Result<ScoreBoard, GameError> {
        let mut surface = HeadlessSurface::new(Bounds::new(800.0, 600.0));
        let mut game = GameLoop::new(GameConfig::load(), seed)?;
        game.start(&surface)?;

        let mut board = ScoreBoard::load();
        let mut navigator = RecordingNavigator::default();
        let dt = 1.0 / FRAME_RATE;

        loop {
            while game.update(dt, &mut surface) == FrameStatus::Continue {
                steer(&mut game);
            }
            dispatch(game.drain_events(), &mut navigator, &mut board);

            if !matches!(game.retry(), RetryAction::Restarted { .. }) {
                dispatch(game.drain_events(), &mut navigator, &mut board);
                break;
            }
        }

        game.stop();
        log::info!(
            "Demo done: {} frames, navigation {:?}",
            game.frames(),
            navigator.signals
        );
        Ok(board)
    }

    fn steer(game: &mut GameLoop) {
        let paddle = game.paddle().position();
        let target = game
            .pool()
            .entities()
            .iter()
            .filter(|e| e.pos.y < paddle.y)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.pos.x);

        if let Some(x) = target {
            let next = Vec2::new(
                paddle.x + (x - paddle.x).clamp(-STEER_SPEED, STEER_SPEED),
                paddle.y,
            );
            game.handle_input(PaddleCommand::Acquire(paddle));
            game.handle_input(PaddleCommand::Release(next));
        }
    }
}
