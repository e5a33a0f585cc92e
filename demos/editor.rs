//! Editor Example - interactive tree editing in the terminal
//!
//! - Move the mouse to see margin, border and padding of the hovered widget
//! - Click to select (click again to deselect)
//! - `a` adds a box, `l` adds a label to the selected widget
//! - `d` flips the flex direction of the selection
//! - Delete / Backspace removes the selection
//! - `q` or Esc quits
//!
//! Set `SPARK_LAYOUT_LOG=/tmp/spark.log` to write logs to a file.
//!
//! Run with: cargo run --example editor

use std::fs::File;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use spark_layout::{
    Cell, CellFont, DiffRenderer, EditorConfig, FrameBuffer, FrameDriver, GlyphSource,
    LayoutConfig, Point, Rgba, Widget,
};
use taffy::{FlexDirection, Style};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let Ok(path) = std::env::var("SPARK_LAYOUT_LOG") else {
        return;
    };
    let Ok(file) = File::create(&path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spark_layout=debug")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let root = Widget::container()
        .with_name("root")
        .with_style(Style {
            flex_direction: FlexDirection::Row,
            ..Default::default()
        })
        .into_ref();

    let editor_config = EditorConfig {
        new_widget_size: (12.0, 5.0),
        ..Default::default()
    };
    let mut driver = FrameDriver::with_config(Rc::clone(&root), LayoutConfig::default(), editor_config)?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;

    let result = run(&mut driver, &mut stdout);

    execute!(stdout, Show, DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}

fn run(driver: &mut FrameDriver, stdout: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let font: Rc<dyn GlyphSource> = Rc::new(CellFont::default());
    let blank = Cell::new(' ', Rgba::BLACK, Rgba::WHITE);

    let (width, height) = terminal::size()?;
    let mut buffer = FrameBuffer::with_blank(width, height, blank);
    let mut renderer = DiffRenderer::new();
    let mut pointer: Option<Point> = None;

    loop {
        buffer.clear();
        let viewport = (f32::from(buffer.width()), f32::from(buffer.height()));
        driver.frame(viewport, pointer, &mut buffer)?;
        renderer.render(stdout, &buffer)?;

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('a') => {
                    if let Err(err) = driver.editor_mut().add_child_widget() {
                        info!(%err, "add box skipped");
                    }
                }
                KeyCode::Char('l') => {
                    if let Err(err) = driver.editor_mut().add_child_label(Rc::clone(&font)) {
                        info!(%err, "add label skipped");
                    }
                }
                KeyCode::Char('d') => {
                    let (tree, editor) = driver.parts_mut();
                    editor.edit_style(tree, |style| {
                        style.flex_direction = match style.flex_direction {
                            FlexDirection::Row => FlexDirection::Column,
                            _ => FlexDirection::Row,
                        };
                        true
                    })?;
                }
                KeyCode::Delete | KeyCode::Backspace => {
                    if let Ok(removed) = driver.editor_mut().remove_selected() {
                        info!(widget = %removed.id(), "removed");
                    }
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                let at = Point::new(f32::from(mouse.column), f32::from(mouse.row));
                match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => pointer = Some(at),
                    MouseEventKind::Down(MouseButton::Left) => {
                        pointer = Some(at);
                        driver.editor_mut().click(at);
                    }
                    _ => {}
                }
            }
            Event::Resize(width, height) => {
                buffer.resize(width, height);
                renderer.invalidate();
            }
            _ => {}
        }
    }

    Ok(())
}
