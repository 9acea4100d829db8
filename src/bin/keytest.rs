// Key event debugger: shows each key press and the action it maps to
// Run with: cargo run --bin keytest

use crossterm::{
    event::{
        self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use std::io;

use lineweave::config::EditorConfig;
use lineweave::input::{Action, KeyPress, Keymap};

fn main() -> anyhow::Result<()> {
    let config = EditorConfig::load()?;
    let keymap = Keymap::with_overrides(&config.keys)?;

    terminal::enable_raw_mode()?;
    let enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
    )
    .is_ok();

    println!("Keyboard enhancement: {}\r", if enhanced { "enabled" } else { "disabled" });
    println!("Press keys to see their actions (interrupt key to quit)\r\n");

    loop {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let press = KeyPress::from_crossterm(key);
                let action = keymap.resolve(&press);
                let name = match &action {
                    Some(Action::Insert(c)) => format!("insert {:?}", c),
                    Some(a) => a.name().unwrap_or("?").to_string(),
                    None => "-".to_string(),
                };
                println!("{:<16} {}\r", press.to_string(), name);
                if action == Some(Action::Interrupt) {
                    break;
                }
            }
            Event::Resize(w, h) => println!("Resize: {}x{}\r", w, h),
            Event::Paste(text) => println!("Paste: {:?}\r", text),
            _ => {}
        }
    }

    if enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    terminal::disable_raw_mode()?;
    Ok(())
}
