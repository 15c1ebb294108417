//! The cross-thread application bridge.
//!
//! The native toolkit owns a dedicated UI thread; everything else talks
//! to it through a `Dispatcher`. `Bridge::launch` spawns the UI thread,
//! runs the application's startup on it, registers the standard
//! commands, and pumps the runtime's loop until the application exits.
//! A panic on the UI thread is captured and re-raised on the thread
//! that joins the bridge, so failures are never silently swallowed.

use std::{
    panic,
    sync::{
        Arc, Mutex, OnceLock,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread::{self, JoinHandle, ThreadId},
};

use scopeguard::defer;
use tracing::{debug, info, warn};

use crate::{
    backend::{LoopClient, LoopControl, LoopMessage, MenuBackend, NativeRuntime},
    command::{Command, CommandList, Group, Section},
    error::{Error, Result},
    key::Shortcut,
    menu,
    style::Style,
    tree::Tree,
};

/// Where the UI loop is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// The loop has not started pumping yet.
    Created,
    /// The loop is pumping messages.
    Running,
    /// A close request is being decided; may return to `Running` if
    /// the exit handler vetoes it.
    Exiting,
    /// The loop has stopped for good.
    Terminated,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<LoopState>,
    ui_thread: OnceLock<ThreadId>,
    close_pending: AtomicBool,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: Mutex::new(LoopState::Created),
            ui_thread: OnceLock::new(),
            close_pending: AtomicBool::new(false),
        }
    }

    fn state(&self) -> LoopState {
        match self.state.lock() {
            Ok(g) => *g,
            Err(e) => *e.into_inner(),
        }
    }

    fn set_state(&self, s: LoopState) {
        match self.state.lock() {
            Ok(mut g) => *g = s,
            Err(mut e) => **e.get_mut() = s,
        }
    }

    fn on_ui_thread(&self) -> bool {
        self.ui_thread
            .get()
            .is_some_and(|id| *id == thread::current().id())
    }
}

/// A cloneable handle for marshalling work onto the UI thread.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::Sender<LoopMessage>,
    shared: Arc<Shared>,
}

impl Dispatcher {
    /// True if the calling thread is the UI thread.
    pub fn on_ui_thread(&self) -> bool {
        self.shared.on_ui_thread()
    }

    /// Run a closure on the UI thread without waiting for it. Runs
    /// inline when already on the UI thread.
    pub fn post<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.on_ui_thread() {
            f();
            return Ok(());
        }
        self.tx.send(LoopMessage::Task(Box::new(f)))?;
        Ok(())
    }

    /// Run a closure on the UI thread and wait for its result. Runs
    /// inline when already on the UI thread, so self-deadlock is not
    /// possible.
    pub fn invoke<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.on_ui_thread() {
            return Ok(f());
        }
        let (rtx, rrx) = mpsc::channel();
        self.tx.send(LoopMessage::Task(Box::new(move || {
            let _ = rtx.send(f());
        })))?;
        Ok(rrx.recv()?)
    }

    /// Ask the UI loop to close. Repeated requests coalesce: only one
    /// close request is in flight at a time.
    pub fn request_close(&self) -> Result<()> {
        if self.shared.close_pending.swap(true, Ordering::SeqCst) {
            debug!("close already pending; coalescing");
            return Ok(());
        }
        self.tx.send(LoopMessage::CloseRequest)?;
        Ok(())
    }

    /// The loop's current state.
    pub fn state(&self) -> LoopState {
        self.shared.state()
    }
}

/// Mutable application state, shared between the UI thread and the
/// rest of the program.
#[derive(Debug)]
pub struct AppState {
    /// The widget tree.
    pub tree: Tree,
    /// The application's commands.
    pub commands: CommandList,
}

/// A cloneable handle onto a running application.
#[derive(Debug, Clone)]
pub struct AppHandle {
    state: Arc<Mutex<AppState>>,
    dispatcher: Dispatcher,
}

impl AppHandle {
    /// Run a closure against the application state.
    pub fn with_state<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut AppState) -> R,
    {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| Error::Internal("application state poisoned".into()))?;
        Ok(f(&mut guard))
    }

    /// The UI thread dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Ask the application to exit. The exit handler may veto.
    pub fn request_exit(&self) -> Result<()> {
        self.dispatcher.request_close()
    }
}

type StartupFn = Box<dyn FnOnce(&AppHandle) + Send>;
type ExitFn = Box<dyn FnMut(&AppHandle) -> bool + Send>;
type AboutFn = Box<dyn FnMut(&AppHandle) + Send>;

/// An application definition: a name, a startup routine, and optional
/// life-cycle hooks.
pub struct Application {
    name: String,
    startup: StartupFn,
    on_exit: Option<ExitFn>,
    on_about: Option<AboutFn>,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Application {
    /// Define an application. The startup routine runs once on the UI
    /// thread before the loop starts pumping.
    pub fn new<F>(name: impl Into<String>, startup: F) -> Self
    where
        F: FnOnce(&AppHandle) + Send + 'static,
    {
        Self {
            name: name.into(),
            startup: Box::new(startup),
            on_exit: None,
            on_about: None,
        }
    }

    /// Set the exit handler. Returning false vetoes the close request
    /// and the loop keeps running.
    pub fn on_exit<F>(mut self, f: F) -> Self
    where
        F: FnMut(&AppHandle) -> bool + Send + 'static,
    {
        self.on_exit = Some(Box::new(f));
        self
    }

    /// Set the handler for the standard About command.
    pub fn on_about<F>(mut self, f: F) -> Self
    where
        F: FnMut(&AppHandle) + Send + 'static,
    {
        self.on_about = Some(Box::new(f));
        self
    }
}

/// A running application: the UI thread plus the handles into it.
#[derive(Debug)]
pub struct Bridge {
    dispatcher: Dispatcher,
    state: Arc<Mutex<AppState>>,
    thread: Option<JoinHandle<Result<()>>>,
}

impl Bridge {
    /// Spawn the UI thread and start the application on it.
    pub fn launch<R>(app: Application, runtime: R, menus: Box<dyn MenuBackend + Send>) -> Result<Self>
    where
        R: NativeRuntime + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let shared = Arc::new(Shared::new());
        let state = Arc::new(Mutex::new(AppState {
            tree: Tree::new(Style::new()),
            commands: CommandList::new(),
        }));
        let dispatcher = Dispatcher {
            tx,
            shared: shared.clone(),
        };

        let thread_dispatcher = dispatcher.clone();
        let thread_state = state.clone();
        let thread = thread::Builder::new()
            .name("pergola-ui".into())
            .spawn(move || run_app(app, runtime, menus, rx, thread_dispatcher, thread_state))
            .map_err(|e| Error::RunLoop(format!("failed to spawn UI thread: {e}")))?;

        Ok(Self {
            dispatcher,
            state,
            thread: Some(thread),
        })
    }

    /// The UI thread dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// A handle onto the running application.
    pub fn handle(&self) -> AppHandle {
        AppHandle {
            state: self.state.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }

    /// The loop's current state.
    pub fn state(&self) -> LoopState {
        self.dispatcher.state()
    }

    /// Ask the application to exit. The exit handler may veto.
    pub fn request_exit(&self) -> Result<()> {
        self.dispatcher.request_close()
    }

    /// Wait for the UI thread to finish. A panic on the UI thread is
    /// re-raised here.
    pub fn join(mut self) -> Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        match thread.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Launch, then block until the application exits.
    pub fn run<R>(app: Application, runtime: R, menus: Box<dyn MenuBackend + Send>) -> Result<()>
    where
        R: NativeRuntime + 'static,
    {
        Self::launch(app, runtime, menus)?.join()
    }
}

fn run_app<R>(
    app: Application,
    mut runtime: R,
    menus: Box<dyn MenuBackend + Send>,
    rx: mpsc::Receiver<LoopMessage>,
    dispatcher: Dispatcher,
    state: Arc<Mutex<AppState>>,
) -> Result<()>
where
    R: NativeRuntime,
{
    let shared = dispatcher.shared.clone();
    let _ = shared.ui_thread.set(thread::current().id());
    defer! {
        shared.set_state(LoopState::Terminated);
    }

    for gap in runtime.initialize()? {
        warn!(feature = gap.feature, detail = %gap.detail, "platform capability missing");
    }

    let handle = AppHandle { state, dispatcher };
    let menu_dirty = Arc::new(AtomicBool::new(false));

    // Batch everything startup does into a single menu rebuild.
    handle.with_state(|s| {
        let dirty = menu_dirty.clone();
        s.commands.set_listener(move || {
            dirty.store(true, Ordering::SeqCst);
        });
        s.commands.begin_update();
    })?;
    info!(name = %app.name, "starting application");
    (app.startup)(&handle);
    let about = app.on_about.map(|f| Arc::new(Mutex::new(f)));
    handle.with_state(|s| {
        add_standard_commands(&mut s.commands, &app.name, &handle, about);
        s.commands.end_update();
    })?;

    shared.set_state(LoopState::Running);
    let mut pump = Pump {
        rx,
        handle,
        menus,
        on_exit: app.on_exit,
        is_exiting: false,
        menu_dirty,
        shared: shared.clone(),
    };
    runtime.run_until_stopped(&mut pump)
}

/// Register the commands every application carries: About in the Help
/// group and Exit in the File group, both pinned to the bottom of
/// their group.
fn add_standard_commands(
    commands: &mut CommandList,
    name: &str,
    handle: &AppHandle,
    about: Option<Arc<Mutex<AboutFn>>>,
) {
    let about_handle = handle.clone();
    commands.add(
        Command::new(format!("About {name}"), Group::new("Help"), move || {
            if let Some(cb) = about.as_ref()
                && let Ok(mut cb) = cb.lock()
            {
                (*cb)(&about_handle);
            }
            Ok(())
        })
        .section(Section::LAST),
    );

    let exit_handle = handle.clone();
    commands.add(
        Command::new("Exit", Group::new("File"), move || {
            exit_handle.request_exit()?;
            Ok(())
        })
        .section(Section::LAST)
        .shortcut(Shortcut::ctrl('q')),
    );
}

/// The UI thread's message pump.
struct Pump {
    rx: mpsc::Receiver<LoopMessage>,
    handle: AppHandle,
    menus: Box<dyn MenuBackend + Send>,
    on_exit: Option<ExitFn>,
    is_exiting: bool,
    menu_dirty: Arc<AtomicBool>,
    shared: Arc<Shared>,
}

impl Pump {
    fn flush_menus(&mut self) -> Result<()> {
        if self.menu_dirty.swap(false, Ordering::SeqCst) {
            self.handle
                .with_state(|s| menu::rebuild(&s.commands, self.menus.as_mut()))??;
        }
        Ok(())
    }

    fn handle_close(&mut self) -> Result<LoopControl> {
        // A fresh request may arrive while the handler runs; it must
        // not be coalesced away.
        self.shared.close_pending.store(false, Ordering::SeqCst);
        if self.is_exiting {
            return Ok(LoopControl::Continue);
        }
        self.shared.set_state(LoopState::Exiting);
        let proceed = match self.on_exit.as_mut() {
            Some(f) => f(&self.handle),
            None => true,
        };
        if !proceed {
            info!("exit vetoed by handler");
            self.shared.set_state(LoopState::Running);
            return Ok(LoopControl::Continue);
        }
        self.is_exiting = true;
        Ok(LoopControl::Stop)
    }
}

impl LoopClient for Pump {
    fn pump_one(&mut self) -> Result<LoopControl> {
        self.flush_menus()?;
        match self.rx.recv()? {
            LoopMessage::Task(task) => {
                task();
                Ok(LoopControl::Continue)
            }
            LoopMessage::CloseRequest => self.handle_close(),
            LoopMessage::Quit => Ok(LoopControl::Stop),
        }
    }
}
