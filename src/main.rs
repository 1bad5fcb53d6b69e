use std::cell::Cell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{Event, MouseEventKind};
use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;

use term_hover::anchor::{AnchorSide, AnchorState};
use term_hover::components::{Component, MENU_SURFACE, MenuAdapter, TerminalHoverMenuView};
use term_hover::constants::{DEFAULT_ANIMATION_FRAMES, DEFAULT_TOUCH_SLOP};
use term_hover::debug_log::{DEFAULT_MAX_LINES, DebugLogHandle, set_global_debug_log};
use term_hover::drivers::{ConsoleInputDriver, ConsoleOutputDriver, InputDriver};
use term_hover::event_loop::{ControlFlow, EventLoop};
use term_hover::keybindings::{Action, KeyBindings, KeyContext};
use term_hover::menu::{HoverMenu, HoverMenuView, InteractionMode, WindowHoverMenu, memento};
use term_hover::persist::VisualStateStore;
use term_hover::ui::UiFrame;
use term_hover::window::TerminalWindowHost;
use term_hover::{theme, tracing_sub};

type DemoMenu = WindowHoverMenu<TerminalWindowHost, TerminalHoverMenuView>;

const LOG_TAIL_LINES: usize = 200;

#[derive(Parser, Debug)]
#[command(
    name = "term-hover",
    version = env!("CARGO_PKG_VERSION"),
    about = "Floating hover menu over a terminal pane"
)]
struct Cli {
    /// Where the collapsed tab's position is saved between runs.
    #[arg(long = "state-file", value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Ignore any saved position and start from the default anchor.
    #[arg(long)]
    fresh: bool,

    /// Delete the saved position before starting. Implies `--fresh`.
    #[arg(long)]
    forget: bool,

    /// Pointer travel, in cells, before a press on the tab becomes a drag.
    #[arg(
        long = "touch-slop",
        value_name = "CELLS",
        default_value_t = DEFAULT_TOUCH_SLOP
    )]
    touch_slop: u16,

    /// Frames an expand or collapse animation takes. 0 disables animation.
    #[arg(
        long = "animation-frames",
        value_name = "N",
        default_value_t = DEFAULT_ANIMATION_FRAMES
    )]
    animation_frames: u16,

    /// Redraw rate while idle.
    #[arg(long, value_name = "FPS", default_value_t = 30)]
    fps: u32,
}

#[derive(Debug)]
struct DemoConfig {
    state_file: PathBuf,
    fresh: bool,
    forget: bool,
    touch_slop: u16,
    animation_frames: u16,
    frame_interval: Duration,
}

impl TryFrom<&Cli> for DemoConfig {
    type Error = String;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if cli.touch_slop > 16 {
            return Err("touch slop must be between 0 and 16 cells".to_string());
        }
        if cli.animation_frames > 120 {
            return Err("animation frames must be between 0 and 120".to_string());
        }
        if !(1..=240).contains(&cli.fps) {
            return Err("fps must be between 1 and 240".to_string());
        }
        Ok(Self {
            state_file: cli
                .state_file
                .clone()
                .unwrap_or_else(VisualStateStore::default_path),
            fresh: cli.fresh || cli.forget,
            forget: cli.forget,
            touch_slop: cli.touch_slop,
            animation_frames: cli.animation_frames,
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(cli.fps)),
        })
    }
}

/// The visual state to start from, honouring `--fresh` and `--forget`.
/// Store failures are logged and treated as "nothing saved".
fn saved_visual_state(store: &VisualStateStore, config: &DemoConfig) -> Option<String> {
    if config.forget {
        match store.clear() {
            Ok(()) => tracing::debug!(path = %store.path().display(), "saved visual state cleared"),
            Err(err) => tracing::warn!(error = %err, "could not clear saved visual state"),
        }
    }
    if config.fresh {
        return None;
    }
    store.load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "starting without saved visual state");
        None
    })
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = DemoConfig::try_from(&cli)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let log = DebugLogHandle::new(DEFAULT_MAX_LINES);
    set_global_debug_log(log.clone());
    tracing_sub::init_default();

    let store = VisualStateStore::new(config.state_file.clone());
    let saved = saved_visual_state(&store, &config);

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let screen = output.size()?;

    let view = TerminalHoverMenuView::new(config.touch_slop, config.animation_frames);
    let mut menu: DemoMenu =
        WindowHoverMenu::new(TerminalWindowHost::new(screen), view, saved.as_deref());
    let anchor = Rc::new(Cell::new(menu.view().anchor_state()));
    menu.set_adapter(Some(Box::new(DemoAdapter {
        log,
        anchor: Rc::clone(&anchor),
        state_file: store.path().to_path_buf(),
        keys: KeyBindings::default(),
    })));

    let exit_store = store.clone();
    menu.add_on_exit_listener(Rc::new(move |final_anchor: AnchorState| {
        if let Err(err) = exit_store.save(&memento::encode(&final_anchor)) {
            tracing::warn!(error = %err, "could not save visual state on exit");
        }
    }));
    menu.show().map_err(io::Error::other)?;

    let mut input = ConsoleInputDriver::new();
    input.set_mouse_capture(true)?;
    let keys = KeyBindings::default();
    let mut pane = BackgroundPane::default();
    let mut event_loop = EventLoop::new(input, config.frame_interval);

    let result = event_loop.run(|_, event| {
        let Some(event) = event else {
            menu.view_mut().tick();
            menu.dispatch_view_events();
            anchor.set(menu.view().anchor_state());
            output.draw(|mut frame| {
                let area = frame.area();
                pane.render(&mut frame, area);
                if menu.is_showing() {
                    menu.view_mut().render(&mut frame, area);
                }
            })?;
            return Ok(ControlFlow::Continue);
        };
        Ok(route_event(&mut menu, &mut pane, &keys, &event))
    });

    let saved = store.save(&menu.visual_state());
    output.exit()?;
    result?;
    if let Err(err) = saved {
        eprintln!("{err}");
    }
    Ok(())
}

fn route_event(
    menu: &mut DemoMenu,
    pane: &mut BackgroundPane,
    keys: &KeyBindings,
    event: &Event,
) -> ControlFlow {
    match event {
        Event::Key(key) => match keys.action_in(KeyContext::Global, key) {
            Some(Action::Quit) => return ControlFlow::Quit,
            Some(Action::ShowMenu) => {
                if let Err(err) = menu.show() {
                    tracing::warn!(error = %err, "could not show hover menu");
                }
            }
            Some(Action::HideMenu) => menu.hide(),
            Some(Action::ToggleMenu) => match menu.interaction_mode() {
                Some(InteractionMode::Drag) => menu.expand_menu(),
                Some(InteractionMode::Menu) => menu.collapse_menu(),
                None => {}
            },
            Some(_) => {}
            None => {
                if menu.is_showing() {
                    menu.view_mut().handle_event(event);
                }
            }
        },
        Event::Mouse(mouse) => {
            let on_menu = menu.is_showing()
                && menu.host().accepts_pointer(
                    MENU_SURFACE,
                    mouse.column,
                    mouse.row,
                    menu.view().hit_region(),
                );
            if on_menu {
                menu.view_mut().handle_event(event);
            } else {
                pane.handle_event(event);
            }
        }
        Event::Resize(width, height) => {
            let area = Rect::new(0, 0, *width, *height);
            menu.host_mut().resize(area);
            menu.view_mut().resize(area);
        }
        _ => {}
    }
    menu.dispatch_view_events();
    ControlFlow::Continue
}

/// Stand-in for the application underneath the overlay.
#[derive(Debug, Default)]
struct BackgroundPane {
    passed_through: usize,
    last_press: Option<(u16, u16)>,
}

impl Component for BackgroundPane {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        let style = Style::default().fg(theme::pane_fg());
        let highlight = Style::default()
            .fg(theme::pane_highlight())
            .add_modifier(Modifier::BOLD);
        let last = self
            .last_press
            .map(|(x, y)| format!("{x},{y}"))
            .unwrap_or_else(|| "-".to_string());
        let text = Text::from(vec![
            Line::styled("term-hover demo", highlight),
            Line::raw(""),
            Line::raw(format!(
                "Pointer events that reached this pane: {}",
                self.passed_through
            )),
            Line::raw(format!("Last press here: {last}")),
            Line::raw(""),
            Line::raw("m expand/collapse  h hide  s show  Ctrl+Q quit"),
        ]);
        frame.fill(area, Style::default());
        frame.render_widget(Paragraph::new(text).style(style), area);
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        self.passed_through += 1;
        if let MouseEventKind::Down(_) = mouse.kind {
            self.last_press = Some((mouse.column, mouse.row));
        }
        true
    }
}

struct DemoAdapter {
    log: DebugLogHandle,
    anchor: Rc<Cell<AnchorState>>,
    state_file: PathBuf,
    keys: KeyBindings,
}

const TITLES: [&str; 3] = ["Intro", "Anchor", "Log"];

impl MenuAdapter for DemoAdapter {
    fn tab_count(&self) -> usize {
        TITLES.len()
    }

    fn tab_title(&self, index: usize) -> String {
        TITLES.get(index).copied().unwrap_or_default().to_string()
    }

    fn content(&self, index: usize) -> Text<'static> {
        match index {
            0 => {
                let mut text = Text::raw(indoc! {"
                    A hover menu floats above whatever runs underneath.

                    Collapsed, it is a small tab on the screen edge. Drag it
                    anywhere; it snaps back to the nearer edge on release.
                    Drop it on the target at the bottom to dismiss it.
                    Tap it to open this menu.
                "});
                text.push_line(Line::raw(""));
                for (keys, label) in self.keys.help_rows(KeyContext::Expanded) {
                    text.push_line(Line::raw(format!("{keys:<18} {label}")));
                }
                text
            }
            1 => {
                let anchor = self.anchor.get();
                let side = match anchor.side {
                    AnchorSide::Left => "left",
                    AnchorSide::Right => "right",
                };
                Text::from(vec![
                    Line::raw(format!("Side:        {side}")),
                    Line::raw(format!("Vertical:    {:.0}%", anchor.normalized_y * 100.0)),
                    Line::raw(format!("Saved as:    {}", memento::encode(&anchor))),
                    Line::raw(format!("State file:  {}", self.state_file.display())),
                ])
            }
            2 => {
                let lines = self.log.tail(LOG_TAIL_LINES);
                if lines.is_empty() {
                    return Text::raw("(log is empty)");
                }
                let mut text = Text::default();
                let evicted = self.log.evicted();
                if evicted > 0 {
                    text.push_line(Line::raw(format!("({evicted} older lines dropped)")));
                }
                for line in lines {
                    text.push_line(Line::raw(line));
                }
                text
            }
            _ => Text::default(),
        }
    }
}
