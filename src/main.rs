//! Water Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::PI;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement,
        HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use water_run::assets::{AssetError, Drawable, FillRect, Sprite, SpriteSet};
    use water_run::presenter::{CONFETTI_COUNT, CONFETTI_LIFETIME_MS, TOAST_DURATION_MS, confetti};
    use water_run::sim::{Direction, GameState};
    use water_run::{FrameOutcome, GameConfig, GameDriver, Presenter, Screen, Tone};

    type Sprites = Rc<RefCell<SpriteSet<HtmlImageElement>>>;

    /// DOM + 2D canvas presentation
    struct CanvasPresenter {
        document: Document,
        ctx: CanvasRenderingContext2d,
        sprites: Sprites,
        rng: Pcg32,
        width: f64,
        height: f64,
    }

    impl CanvasPresenter {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn draw_background(&self, state: &GameState, time: f64) {
            let t = time * 0.00025;
            if let Ok(g) = self.ctx.create_radial_gradient(
                self.width * 0.5,
                self.height * 0.1,
                40.0 + 30.0 * t.sin(),
                self.width * 0.5,
                self.height * 0.85,
                self.height * 0.95,
            ) {
                let _ = g.add_color_stop(0.0, "#0b2140");
                let _ = g.add_color_stop(1.0, "#081523");
                self.ctx.set_fill_style_canvas_gradient(&g);
                self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
            }

            // Finish banner
            if state.camera.is_above_bottom(state.track_length, 60.0) {
                let finish_y = state.camera.project(state.track_length) as f64;
                self.ctx.set_fill_style_str("#FFD84D");
                self.ctx.fill_rect(0.0, finish_y - 6.0, self.width, 12.0);
                self.ctx.set_fill_style_str("#111");
                self.ctx
                    .set_font("bold 18px system-ui, -apple-system, Segoe UI, Roboto, sans-serif");
                self.ctx.set_text_align("center");
                let _ = self.ctx.fill_text("FINISH", self.width / 2.0, finish_y - 12.0);
            }
        }

        fn draw(&self, drawable: Drawable<'_, HtmlImageElement>, x: f32, y: f32) {
            let (x, y) = (x as f64, y as f64);
            match drawable {
                Drawable::Image {
                    image,
                    width,
                    height,
                } => {
                    let (w, h) = (width as f64, height as f64);
                    let _ = self
                        .ctx
                        .draw_image_with_html_image_element_and_dw_and_dh(
                            image,
                            x - w / 2.0,
                            y - h / 2.0,
                            w,
                            h,
                        );
                }
                Drawable::Shapes(rects) => self.draw_rects(&rects, x, y),
            }
        }

        fn draw_rects(&self, rects: &[FillRect], x: f64, y: f64) {
            for rect in rects {
                self.ctx.set_fill_style_str(rect.color);
                self.ctx.fill_rect(
                    x + rect.x as f64,
                    y + rect.y as f64,
                    rect.w as f64,
                    rect.h as f64,
                );
            }
        }

        fn draw_runner(&self, state: &GameState) {
            let x = state.runner_x() as f64;
            let y = state.camera.project(state.runner.y) as f64;

            // Body
            self.ctx.set_fill_style_str("#60a5fa");
            self.ctx.fill_rect(x - 18.0, y - 32.0, 36.0, 52.0);
            // Head
            self.ctx.begin_path();
            self.ctx.set_fill_style_str("#93c5fd");
            let _ = self.ctx.arc(x, y - 40.0, 12.0, 0.0, PI * 2.0);
            self.ctx.fill();
        }
    }

    impl Presenter for CanvasPresenter {
        fn show_screen(&mut self, screen: Screen) {
            for other in [Screen::Start, Screen::Game, Screen::Finish] {
                if let Some(el) = self.document.get_element_by_id(other.element_id()) {
                    let _ = el.class_list().remove_1("show");
                }
            }
            if let Some(el) = self.document.get_element_by_id(screen.element_id()) {
                let _ = el.class_list().add_1("show");
            }
        }

        fn set_time_display(&mut self, seconds: f32) {
            self.set_text("hudTime", &water_run::format_seconds(seconds));
        }

        fn set_collectible_count_display(&mut self, count: u32) {
            self.set_text("hudJugs", &count.to_string());
        }

        fn notify_transient(&mut self, text: &str, tone: Tone) {
            let Some(toast) = self
                .document
                .get_element_by_id("toast")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            toast.set_text_content(Some(text));
            let style = toast.style();
            let _ = style.set_property("color", tone.color());
            let _ = style.set_property("opacity", "1");

            let fade = Closure::once_into_js(move || {
                let _ = toast.style().set_property("opacity", "0");
            });
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    fade.unchecked_ref(),
                    TOAST_DURATION_MS as i32,
                );
            }
        }

        fn set_final_time(&mut self, seconds: f32) {
            self.set_text("finalTime", &water_run::format_final_time(seconds));
        }

        fn trigger_celebration(&mut self) {
            let Some(wrap) = self.document.query_selector(".stage-wrap").ok().flatten() else {
                return;
            };
            let Some(window) = web_sys::window() else {
                return;
            };

            for piece in confetti(&mut self.rng, CONFETTI_COUNT) {
                let Ok(el) = self.document.create_element("div") else {
                    continue;
                };
                el.set_class_name("confetti");
                if let Ok(html) = el.clone().dyn_into::<HtmlElement>() {
                    let style = html.style();
                    let _ = style.set_property("left", &format!("{}%", piece.left_percent));
                    let _ = style.set_property("background", piece.color);
                    let _ = style
                        .set_property("animation-duration", &format!("{}s", piece.duration_secs));
                }
                let _ = wrap.append_child(&el);

                let remove = Closure::once_into_js(move || el.remove());
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    remove.unchecked_ref(),
                    CONFETTI_LIFETIME_MS as i32,
                );
            }
        }

        fn clear_celebration(&mut self) {
            if let Ok(nodes) = self.document.query_selector_all(".confetti") {
                for i in 0..nodes.length() {
                    if let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                        el.remove();
                    }
                }
            }
        }

        fn render(&mut self, state: &GameState, timestamp_ms: f64) {
            self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
            self.draw_background(state, timestamp_ms);

            let sprites = self.sprites.borrow();
            for jug in &state.jugs {
                let y = state.camera.project(jug.pos.y);
                self.draw(sprites.jug_drawable(), jug.pos.x, y);
            }
            for hazard in &state.hazards {
                let y = state.camera.project(hazard.pos.y);
                self.draw(sprites.hazard_drawable(hazard), hazard.pos.x, y);
            }
            drop(sprites);

            self.draw_runner(state);
        }
    }

    /// Driver plus host-side loop bookkeeping
    struct Game {
        driver: GameDriver<CanvasPresenter>,
        /// A requestAnimationFrame callback is outstanding
        loop_scheduled: bool,
        touch_start: Option<(f32, f32)>,
    }

    type SharedGame = Rc<RefCell<Game>>;

    /// Resolve once the browser has the image, or fail
    async fn load_image(src: &str) -> Result<HtmlImageElement, AssetError> {
        let img = HtmlImageElement::new().map_err(|e| AssetError::Platform(format!("{:?}", e)))?;
        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            img.set_onload(Some(&resolve));
            img.set_onerror(Some(&reject));
        });
        img.set_src(src);
        JsFuture::from(promise)
            .await
            .map_err(|_| AssetError::Load(src.to_string()))?;
        Ok(img)
    }

    fn load_sprites(sprites: Sprites) {
        for sprite in Sprite::ALL {
            let sprites = sprites.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = load_image(sprite.path()).await;
                sprites
                    .borrow_mut()
                    .handle_mut(sprite)
                    .resolve(sprite.path(), result);
            });
        }
    }

    /// Config from the canvas `data-config` attribute, if any
    fn read_config(canvas: &HtmlCanvasElement) -> GameConfig {
        match canvas.get_attribute("data-config") {
            Some(json) => GameConfig::from_json(&json).unwrap_or_else(|err| {
                log::error!("{}; using defaults", err);
                GameConfig::default()
            }),
            None => GameConfig::default(),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Water Run starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("stage")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let config = read_config(&canvas);
        canvas.set_width(config.viewport_width as u32);
        canvas.set_height(config.viewport_height as u32);

        let sprites: Sprites = Rc::new(RefCell::new(SpriteSet::default()));
        load_sprites(sprites.clone());

        let seed = js_sys::Date::now() as u64;
        let presenter = CanvasPresenter {
            document: document.clone(),
            ctx,
            sprites,
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            width: config.viewport_width as f64,
            height: config.viewport_height as f64,
        };

        let game = Rc::new(RefCell::new(Game {
            driver: GameDriver::new(config, presenter, seed),
            loop_scheduled: false,
            touch_start: None,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game);

        log::info!("Water Run ready!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: SharedGame) {
        let window = web_sys::window().unwrap();

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(direction) = Direction::from_key(&event.key()) {
                    let mut g = game.borrow_mut();
                    if g.driver.is_active() {
                        event.prevent_default();
                    }
                    g.driver.key_down(direction);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(direction) = Direction::from_key(&event.key()) {
                    game.borrow_mut().driver.key_up(direction);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: remember where the swipe began
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.changed_touches().get(0) {
                    game.borrow_mut().touch_start =
                        Some((touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: classify the swipe
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let Some((sx, sy)) = g.touch_start.take() else {
                    return;
                };
                if let Some(touch) = event.changed_touches().get(0) {
                    let dx = touch.client_x() as f32 - sx;
                    let dy = touch.client_y() as f32 - sy;
                    g.driver.swipe(dx, dy);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: SharedGame) {
        for id in ["btnStart", "btnPlayAgain"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().driver.start();
                    ensure_loop(&game);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("btnReset") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().driver.reset_to_start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Start the frame loop unless one is already running
    fn ensure_loop(game: &SharedGame) {
        let mut g = game.borrow_mut();
        if g.loop_scheduled {
            return;
        }
        g.loop_scheduled = true;
        drop(g);
        request_animation_frame(game.clone());
    }

    fn request_animation_frame(game: SharedGame) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: SharedGame, time: f64) {
        let outcome = game.borrow_mut().driver.frame(time);
        match outcome {
            FrameOutcome::Continue => request_animation_frame(game),
            FrameOutcome::Stop => game.borrow_mut().loop_scheduled = false,
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use water_run::presenter::HeadlessPresenter;
    use water_run::sim::{Direction, SessionPhase};
    use water_run::{GameConfig, GameDriver};

    /// 60 Hz host frames
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 600;

    env_logger::init();
    log::info!("Water Run (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for the web version");

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load_file(std::path::Path::new(&path)).unwrap_or_else(|err| {
            log::error!("{}; using defaults", err);
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut driver = GameDriver::new(config, HeadlessPresenter::default(), seed);
    driver.start();
    // Arms a hold-to-move session and keeps climbing; a single jump under auto-run
    driver.key_down(Direction::Up);

    driver.run_frames((0..MAX_FRAMES).map(|i| i as f64 * FRAME_MS), |_| {});

    let state = driver.state();
    if state.phase == SessionPhase::Finished {
        println!(
            "Finished in {} with {} jugs ({} frames)",
            water_run::format_seconds(state.elapsed),
            state.jug_count,
            driver.presenter().frames
        );
    } else {
        println!("Did not finish within {} frames", MAX_FRAMES);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
