#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = native::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::any::Any;
    use std::env;
    use std::fmt;
    use std::panic::{self, AssertUnwindSafe};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{anyhow, bail, Context, Result};
    use log::info;
    use pollster::block_on;
    use winit::dpi::LogicalSize;
    use winit::event::{Event, WindowEvent};
    use winit::event_loop::{ControlFlow, EventLoop};
    use winit::platform::run_return::EventLoopExtRunReturn;
    use winit::window::{Window, WindowBuilder};

    use mini_raid::{
        run_headless, App, CubeScene, GpuContext, HeadlessContext, LabelLog, Overlay,
        SceneConfig,
    };

    const TITLE: &str = "MiniRAID";
    const USAGE: &str =
        "Usage: mini-raid [--headless] [--frames N] [--step SECONDS] [--config FILE]";
    const DEFAULT_HEADLESS_FRAMES: u64 = 120;

    pub fn run() -> Result<()> {
        let options = CliOptions::parse()?;
        let config = match &options.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };

        if options.headless {
            return run_without_window(config, &options);
        }

        match run_interactive(config.clone(), options.frames) {
            Ok(()) => Ok(()),
            Err(err) => {
                if err.downcast_ref::<WindowInitError>().is_some() {
                    eprintln!(
                        "{err}. Falling back to --headless mode (set DISPLAY or install X11 libs to enable rendering)."
                    );
                    run_without_window(config, &options)
                } else {
                    Err(err)
                }
            }
        }
    }

    fn run_without_window(config: SceneConfig, options: &CliOptions) -> Result<()> {
        let frames = options.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES);
        println!(
            "Running {frames} headless frame(s) at {:.4}s per frame",
            options.step
        );

        let mut gfx = HeadlessContext::new();
        let mut overlay = LabelLog::new();
        let mut app = App::new(CubeScene::new(config));
        run_headless(&mut app, &mut gfx, &mut overlay, frames, options.step)?;

        for (id, text) in overlay.labels() {
            println!("#{id}: {text}");
        }
        println!(
            "Presented {} frame(s) with {} draw call(s)",
            gfx.frames_presented(),
            gfx.draws().len()
        );
        Ok(())
    }

    fn run_interactive(config: SceneConfig, frames: Option<u64>) -> Result<()> {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
        panic::set_hook(default_hook);
        let mut event_loop =
            event_loop.map_err(|panic| WindowInitError::from_panic("event loop", panic))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(TITLE)
                .with_inner_size(LogicalSize::new(1280.0, 720.0))
                .build(&event_loop)
                .map_err(|err| WindowInitError::from_error("window", err))?,
        );

        let mut gfx = block_on(GpuContext::new(Arc::clone(&window)))?;
        let mut app = App::new(CubeScene::new(config));
        app.start(&mut gfx, 0.0)?;
        info!("window loop started");

        let mut state = AppState {
            gfx,
            app,
            overlay: TitleOverlay { window },
            started: Instant::now(),
            frames: FrameBudget(frames),
            last_error: None,
        };

        event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;
            if let Err(err) = state.process_event(&event, control_flow) {
                state.last_error = Some(err);
                control_flow.set_exit();
            }
        });

        if let Some(err) = state.last_error {
            return Err(err);
        }
        Ok(())
    }

    struct AppState {
        gfx: GpuContext,
        app: App<CubeScene>,
        overlay: TitleOverlay,
        started: Instant,
        frames: FrameBudget,
        last_error: Option<anyhow::Error>,
    }

    impl AppState {
        fn process_event(
            &mut self,
            event: &Event<()>,
            control_flow: &mut ControlFlow,
        ) -> Result<()> {
            match event {
                Event::WindowEvent { event, window_id } if *window_id == self.gfx.window_id() => {
                    match event {
                        WindowEvent::CloseRequested => {
                            control_flow.set_exit();
                        }
                        WindowEvent::Resized(size) => {
                            self.gfx.resize(*size);
                        }
                        WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                            self.gfx.resize(**new_inner_size);
                        }
                        _ => {}
                    }
                }
                Event::RedrawRequested(window_id) if *window_id == self.gfx.window_id() => {
                    if !self.frames.take() {
                        control_flow.set_exit();
                        return Ok(());
                    }
                    let now = self.started.elapsed().as_secs_f64();
                    self.app.frame(now, &mut self.gfx, &mut self.overlay)?;
                    if self.frames.is_spent() {
                        control_flow.set_exit();
                    }
                }
                Event::MainEventsCleared => {
                    self.gfx.window().request_redraw();
                }
                _ => {}
            }
            Ok(())
        }
    }

    /// Frames the window loop may still render; `None` means unlimited.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct FrameBudget(Option<u64>);

    impl FrameBudget {
        fn is_spent(&self) -> bool {
            self.0 == Some(0)
        }

        /// Claims one frame. Returns `false` once the budget is spent.
        fn take(&mut self) -> bool {
            match self.0.as_mut() {
                Some(0) => false,
                Some(left) => {
                    *left -= 1;
                    true
                }
                None => true,
            }
        }
    }

    /// Shows the latest label text in the window title.
    struct TitleOverlay {
        window: Arc<Window>,
    }

    impl Overlay for TitleOverlay {
        fn set_label(&mut self, _id: &str, text: &str) -> Result<()> {
            self.window.set_title(&format!("{TITLE} - {text}"));
            Ok(())
        }
    }

    #[derive(Debug)]
    struct WindowInitError {
        message: String,
    }

    impl WindowInitError {
        fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
            Self {
                message: format!("failed to initialize {stage}: {}", panic_message(panic)),
            }
        }

        fn from_error(stage: &str, err: impl fmt::Display) -> Self {
            Self {
                message: format!("failed to initialize {stage}: {err}"),
            }
        }
    }

    impl fmt::Display for WindowInitError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.message)
        }
    }

    impl std::error::Error for WindowInitError {}

    fn panic_message(panic: Box<dyn Any + Send>) -> String {
        match panic.downcast::<String>() {
            Ok(msg) => *msg,
            Err(panic) => match panic.downcast::<&'static str>() {
                Ok(msg) => (*msg).to_string(),
                Err(_) => "unknown panic".into(),
            },
        }
    }

    #[derive(Debug)]
    struct CliOptions {
        headless: bool,
        frames: Option<u64>,
        step: f64,
        config: Option<PathBuf>,
    }

    impl CliOptions {
        fn parse() -> Result<Self> {
            Self::parse_from(env::args().skip(1))
        }

        fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Self> {
            let mut options = Self {
                headless: false,
                frames: None,
                step: 1.0 / 60.0,
                config: None,
            };
            let mut args = args.into_iter();
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--headless" => options.headless = true,
                    "--frames" => {
                        let value = flag_value(&mut args, "--frames")?;
                        let frames = value
                            .parse::<u64>()
                            .with_context(|| format!("invalid --frames value `{value}`"))?;
                        options.frames = Some(frames);
                    }
                    "--step" => {
                        let value = flag_value(&mut args, "--step")?;
                        let step = value
                            .parse::<f64>()
                            .with_context(|| format!("invalid --step value `{value}`"))?;
                        if !step.is_finite() || step < 0.0 {
                            bail!("--step must be a non-negative number of seconds, got {value}");
                        }
                        options.step = step;
                    }
                    "--config" => {
                        options.config = Some(PathBuf::from(flag_value(&mut args, "--config")?));
                    }
                    other => {
                        return Err(anyhow!("Unknown argument: {other}\n{USAGE}"));
                    }
                }
            }
            Ok(options)
        }
    }

    fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
        args.next()
            .ok_or_else(|| anyhow!("{flag} needs a value\n{USAGE}"))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> Result<CliOptions> {
            CliOptions::parse_from(args.iter().map(|arg| arg.to_string()))
        }

        #[test]
        fn defaults() {
            let options = parse(&[]).unwrap();
            assert!(!options.headless);
            assert_eq!(options.frames, None);
            assert!((options.step - 1.0 / 60.0).abs() < 1e-12);
            assert!(options.config.is_none());
        }

        #[test]
        fn all_flags() {
            let options = parse(&[
                "--headless",
                "--frames",
                "5",
                "--step",
                "0.5",
                "--config",
                "scene.xml",
            ])
            .unwrap();
            assert!(options.headless);
            assert_eq!(options.frames, Some(5));
            assert_eq!(options.step, 0.5);
            assert_eq!(options.config, Some(PathBuf::from("scene.xml")));
        }

        #[test]
        fn zero_frame_budget_renders_nothing() {
            let mut budget = FrameBudget(Some(0));
            assert!(budget.is_spent());
            assert!(!budget.take());
            assert_eq!(budget, FrameBudget(Some(0)));
        }

        #[test]
        fn frame_budget_counts_down() {
            let mut budget = FrameBudget(Some(2));
            assert!(budget.take());
            assert!(!budget.is_spent());
            assert!(budget.take());
            assert!(budget.is_spent());
            assert!(!budget.take());

            let mut unlimited = FrameBudget(None);
            assert!((0..1000).all(|_| unlimited.take()));
            assert!(!unlimited.is_spent());
        }

        #[test]
        fn rejects_bad_input() {
            assert!(parse(&["--frames"]).is_err());
            assert!(parse(&["--frames", "many"]).is_err());
            assert!(parse(&["--step", "-1"]).is_err());
            assert!(parse(&["--fullscreen"]).is_err());
        }
    }
}
