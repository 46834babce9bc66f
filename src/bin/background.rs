//! Solid-colour background client.
//!
//! Connects to a compositor advertising the zbackground_v1 global, fills a
//! shared-memory buffer with the requested colour and hands one background
//! surface per output to the compositor. Runs until the connection ends.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::os::unix::io::AsFd;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use wayland_client::{
    protocol::{wl_buffer, wl_compositor, wl_output, wl_registry, wl_shm, wl_shm_pool, wl_surface},
    Connection, Dispatch, Proxy, QueueHandle, WEnum,
};
use wayland_protocols::wp::viewporter::client::{wp_viewport, wp_viewporter};

use alcove::protocol::background::client::zbackground_v1::{self, ZbackgroundV1};
use alcove::util::colour::Colour;

// Distinct exit code per startup failure.
const EXIT_NO_RUNTIME_DIR: i32 = 1;
const EXIT_RUNTIME_DIR_CREATE: i32 = 2;
const EXIT_CONNECT: i32 = 3;
const EXIT_MISSING_GLOBALS: i32 = 4;
const EXIT_BUFFER: i32 = 5;

const WL_COMPOSITOR_VERSION: u32 = 4;
const WL_SHM_VERSION: u32 = 1;
const WL_OUTPUT_VERSION: u32 = 4;
const WP_VIEWPORTER_VERSION: u32 = 1;
const BACKGROUND_VERSION: u32 = 1;

#[derive(Parser)]
#[command(
    name = "alcove-background",
    about = "Demo client for the background protocol",
    version
)]
struct Args {
    /// Background colour, #RGB[A] or #RRGGBB[AA]
    #[arg(default_value = "#000000")]
    colour: Colour,

    /// Width of the initial buffer
    #[arg(short, long, default_value_t = 1920)]
    width: u32,

    /// Height of the initial buffer
    #[arg(long, default_value_t = 1080)]
    height: u32,
}

struct BackgroundOutput {
    global_name: u32,
    output: wl_output::WlOutput,
    width: u32,
    height: u32,
    scale: i32,
    surface: Option<wl_surface::WlSurface>,
    viewport: Option<wp_viewport::WpViewport>,
}

struct Background {
    colour: Colour,
    runtime_dir: PathBuf,
    compositor: Option<wl_compositor::WlCompositor>,
    shm: Option<wl_shm::WlShm>,
    background: Option<ZbackgroundV1>,
    viewporter: Option<wp_viewporter::WpViewporter>,
    outputs: Vec<BackgroundOutput>,
    buffer: Option<wl_buffer::WlBuffer>,
    width: u32,
    height: u32,
}

impl Background {
    fn new(args: &Args, runtime_dir: PathBuf) -> Self {
        Self {
            colour: args.colour,
            runtime_dir,
            compositor: None,
            shm: None,
            background: None,
            viewporter: None,
            outputs: Vec::new(),
            buffer: None,
            width: args.width,
            height: args.height,
        }
    }

    /// Fill a file-backed pool with the colour and replace the current
    /// buffer. Existing surfaces are re-attached to the new buffer.
    fn create_buffer(&mut self, qh: &QueueHandle<Self>) -> anyhow::Result<()> {
        let shm = self.shm.as_ref().context("wl_shm missing")?;
        let stride = self.width * 4;
        let size = stride * self.height;

        let path = self.runtime_dir.join("wayland-surface");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("creating a buffer file of {size} B at {}", path.display()))?;
        // Scratch file; the fd keeps it alive.
        let _ = std::fs::remove_file(&path);

        let pixel = self.colour.to_xrgb8888().to_le_bytes();
        let mut row = Vec::with_capacity(stride as usize);
        for _ in 0..self.width {
            row.extend_from_slice(&pixel);
        }
        let mut writer = BufWriter::new(&file);
        for _ in 0..self.height {
            writer.write_all(&row).context("filling the buffer")?;
        }
        writer.flush().context("filling the buffer")?;

        let pool = shm.create_pool(file.as_fd(), size as i32, qh, ());
        let buffer = pool.create_buffer(
            0,
            self.width as i32,
            self.height as i32,
            stride as i32,
            wl_shm::Format::Xrgb8888,
            qh,
            (),
        );
        pool.destroy();

        // A replaced buffer is destroyed from its release event once every
        // surface has re-committed with the new one.
        self.buffer = Some(buffer);

        for i in 0..self.outputs.len() {
            if self.outputs[i].surface.is_some() {
                self.update_surface(i);
            }
        }
        Ok(())
    }

    /// Grow the buffer if the output needs a bigger one, then (re)publish
    /// the output's background surface.
    fn ensure_surface(&mut self, index: usize, qh: &QueueHandle<Self>) {
        if self.buffer.is_none() {
            // Still starting up; surfaces are published after the first
            // buffer exists.
            return;
        }

        let (needed_w, needed_h) = {
            let output = &self.outputs[index];
            let scale = output.scale.max(1) as u32;
            (output.width * scale, output.height * scale)
        };
        if needed_w > self.width || needed_h > self.height {
            self.width = self.width.max(needed_w);
            self.height = self.height.max(needed_h);
            if let Err(err) = self.create_buffer(qh) {
                tracing::warn!(%err, "couldn't grow the background buffer");
                return;
            }
        }

        if self.outputs[index].surface.is_none() {
            let Some(compositor) = self.compositor.as_ref() else { return };
            let surface = compositor.create_surface(qh, ());
            let viewport = self
                .viewporter
                .as_ref()
                .map(|viewporter| viewporter.get_viewport(&surface, qh, ()));
            self.outputs[index].surface = Some(surface);
            self.outputs[index].viewport = viewport;
        }

        self.update_surface(index);
    }

    fn update_surface(&self, index: usize) {
        let output = &self.outputs[index];
        let (Some(surface), Some(buffer), Some(background)) =
            (output.surface.as_ref(), self.buffer.as_ref(), self.background.as_ref())
        else {
            return;
        };

        surface.attach(Some(buffer), 0, 0);
        if surface.version() >= 3 {
            surface.set_buffer_scale(output.scale.max(1));
        }
        if let Some(viewport) = output.viewport.as_ref() {
            viewport.set_destination(output.width as i32, output.height as i32);
        }
        surface.commit();

        background.set_background(surface, &output.output);
        tracing::info!(
            output = output.global_name,
            width = output.width,
            height = output.height,
            "background surface published"
        );
    }

    fn release_output(&mut self, index: usize) {
        let output = self.outputs.remove(index);
        if let Some(viewport) = output.viewport {
            viewport.destroy();
        }
        if let Some(surface) = output.surface {
            surface.destroy();
        }
        if output.output.version() >= 3 {
            output.output.release();
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

impl Dispatch<wl_registry::WlRegistry, ()> for Background {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_registry::Event::Global { name, interface, version } => match &interface[..] {
                "wl_compositor" => {
                    state.compositor =
                        Some(registry.bind(name, version.min(WL_COMPOSITOR_VERSION), qh, ()));
                }
                "wl_shm" => {
                    state.shm = Some(registry.bind(name, version.min(WL_SHM_VERSION), qh, ()));
                }
                "wp_viewporter" => {
                    state.viewporter =
                        Some(registry.bind(name, version.min(WP_VIEWPORTER_VERSION), qh, ()));
                }
                "zbackground_v1" => {
                    state.background =
                        Some(registry.bind(name, version.min(BACKGROUND_VERSION), qh, ()));
                }
                "wl_output" => {
                    let output = registry.bind(name, version.min(WL_OUTPUT_VERSION), qh, name);
                    state.outputs.push(BackgroundOutput {
                        global_name: name,
                        output,
                        width: 0,
                        height: 0,
                        scale: 1,
                        surface: None,
                        viewport: None,
                    });
                }
                _ => {}
            },
            wl_registry::Event::GlobalRemove { name } => {
                if let Some(index) =
                    state.outputs.iter().position(|output| output.global_name == name)
                {
                    state.release_output(index);
                }
            }
            _ => {}
        }
    }
}

// ============================================================================
// Outputs
// ============================================================================

impl Dispatch<wl_output::WlOutput, u32> for Background {
    fn event(
        state: &mut Self,
        output: &wl_output::WlOutput,
        event: wl_output::Event,
        global_name: &u32,
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        let Some(index) =
            state.outputs.iter().position(|entry| entry.global_name == *global_name)
        else {
            return;
        };

        match event {
            wl_output::Event::Mode { flags: WEnum::Value(flags), width, height, .. } => {
                if !flags.contains(wl_output::Mode::Current) {
                    return;
                }
                state.outputs[index].width = width.max(0) as u32;
                state.outputs[index].height = height.max(0) as u32;
                // v1 outputs never send done.
                if output.version() < 2 {
                    state.ensure_surface(index, qh);
                }
            }
            wl_output::Event::Scale { factor } => {
                state.outputs[index].scale = factor;
            }
            wl_output::Event::Done => {
                state.ensure_surface(index, qh);
            }
            _ => {}
        }
    }
}

// ============================================================================
// Quiet protocol objects
// ============================================================================

impl Dispatch<wl_compositor::WlCompositor, ()> for Background {
    fn event(
        _: &mut Self,
        _: &wl_compositor::WlCompositor,
        _: wl_compositor::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_surface::WlSurface, ()> for Background {
    fn event(
        _: &mut Self,
        _: &wl_surface::WlSurface,
        _: wl_surface::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_shm::WlShm, ()> for Background {
    fn event(
        _: &mut Self,
        _: &wl_shm::WlShm,
        _: wl_shm::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_shm_pool::WlShmPool, ()> for Background {
    fn event(
        _: &mut Self,
        _: &wl_shm_pool::WlShmPool,
        _: wl_shm_pool::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_buffer::WlBuffer, ()> for Background {
    fn event(
        state: &mut Self,
        buffer: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            let current = state.buffer.as_ref().map(|b| b.id());
            if current != Some(buffer.id()) {
                buffer.destroy();
            }
        }
    }
}

impl Dispatch<wp_viewporter::WpViewporter, ()> for Background {
    fn event(
        _: &mut Self,
        _: &wp_viewporter::WpViewporter,
        _: wp_viewporter::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wp_viewport::WpViewport, ()> for Background {
    fn event(
        _: &mut Self,
        _: &wp_viewport::WpViewport,
        _: wp_viewport::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<ZbackgroundV1, ()> for Background {
    fn event(
        _: &mut Self,
        _: &ZbackgroundV1,
        _: zbackground_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

// ============================================================================
// Startup
// ============================================================================

fn run(args: Args) -> i32 {
    let Some(base) = std::env::var_os("XDG_RUNTIME_DIR") else {
        tracing::error!("XDG_RUNTIME_DIR is not set");
        return EXIT_NO_RUNTIME_DIR;
    };
    let runtime_dir = PathBuf::from(base).join("alcove");
    if let Err(err) = std::fs::create_dir_all(&runtime_dir) {
        tracing::error!(%err, path = %runtime_dir.display(), "couldn't create the runtime directory");
        return EXIT_RUNTIME_DIR_CREATE;
    }

    let conn = match Connection::connect_to_env() {
        Ok(conn) => conn,
        Err(err) => {
            tracing::error!(%err, "couldn't connect to the display");
            return EXIT_CONNECT;
        }
    };

    let mut queue = conn.new_event_queue();
    let qh = queue.handle();
    let _registry = conn.display().get_registry(&qh, ());

    let mut state = Background::new(&args, runtime_dir);
    if let Err(err) = queue.roundtrip(&mut state) {
        tracing::error!(%err, "initial roundtrip failed");
        return EXIT_CONNECT;
    }

    if state.compositor.is_none() {
        tracing::error!("no wl_compositor interface provided by the compositor");
        return EXIT_MISSING_GLOBALS;
    }
    if state.shm.is_none() {
        tracing::error!("no wl_shm interface provided by the compositor");
        return EXIT_MISSING_GLOBALS;
    }
    if state.background.is_none() {
        tracing::error!("no zbackground_v1 interface provided by the compositor");
        return EXIT_MISSING_GLOBALS;
    }

    if let Err(err) = state.create_buffer(&qh) {
        tracing::error!(%err, "couldn't create the background buffer");
        return EXIT_BUFFER;
    }

    loop {
        if let Err(err) = queue.blocking_dispatch(&mut state) {
            tracing::warn!(%err, "couldn't dispatch events");
            return 0;
        }
    }
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
            "%Y-%m-%d %H:%M:%S".to_string(),
        ))
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .init();

    std::process::exit(run(args));
}
