//! Toadbin - replays keystrokes through the editing assistant.
//!
//! Usage: toadbin [--config FILE] [--store DIR] [--lang NAME] [--html] [--copy] FILE [KEY...]

mod store;

use std::cell::RefCell;
use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;
use store::DirectoryStore;
use toadbin_core::{
    AssistConfig, CharacterCounter, Editor, HighlightListener, KeyOutcome, Language,
};
use toadbin_ui::{
    command_for, execute_command, parse_key_notation, Copier, CopyOutcome, CopyTarget,
    NotificationManager,
};

const USAGE: &str =
    "Usage: toadbin [--config FILE] [--store DIR] [--lang NAME] [--html] [--copy] FILE [KEY...]";

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    store: Option<String>,
    lang: Option<String>,
    html: bool,
    copy: bool,
    file: String,
    keys: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut file = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(args.next().ok_or("--config needs a file")?),
            "--store" => parsed.store = Some(args.next().ok_or("--store needs a directory")?),
            "--lang" => parsed.lang = Some(args.next().ok_or("--lang needs a language name")?),
            "--html" => parsed.html = true,
            "--copy" => parsed.copy = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if file.is_none() => file = Some(arg),
            _ => parsed.keys.push(arg),
        }
    }

    parsed.file = file.ok_or_else(|| USAGE.to_string())?;
    Ok(parsed)
}

/// Mirror for `--html`: an explicit `--lang`, else the file extension, else
/// whatever the content looks like.
fn highlight_listener(lang: Option<&str>, file: &Path) -> HighlightListener {
    let language = match lang {
        Some(name) => Language::from_name(name),
        None => Language::from_path(file),
    };
    if lang.is_none() && language == Language::PlainText {
        HighlightListener::auto()
    } else {
        HighlightListener::new(language)
    }
}

/// Replays key notations, routing undo/redo shortcuts and running the save
/// flow on the save shortcut.
fn replay(
    editor: &mut Editor,
    keys: &[String],
    mut store: Option<&mut DirectoryStore>,
) -> Result<(), String> {
    for notation in keys {
        let event = parse_key_notation(notation).map_err(|e| format!("{notation:?}: {e}"))?;
        if execute_command(editor, command_for(event)) != KeyOutcome::SaveRequested {
            continue;
        }
        let Some(store) = store.as_deref_mut() else {
            log::warn!("Save requested but no --store directory was given");
            continue;
        };
        match editor.save_with(store) {
            Ok(Some(path)) => log::info!("Saved, redirecting to {}", path),
            Ok(None) => {}
            Err(e) => log::error!("{}", e),
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => AssistConfig::load(path).map_err(|e| format!("{path}: {e}"))?,
        None => AssistConfig::default(),
    };

    let mut editor = Editor::with_config(config);
    let counter = Rc::new(RefCell::new(CharacterCounter::new()));
    let highlighter = Rc::new(RefCell::new(highlight_listener(
        args.lang.as_deref(),
        Path::new(&args.file),
    )));
    editor.add_listener(Box::new(counter.clone()));
    editor.add_listener(Box::new(highlighter.clone()));

    log::info!("Opening file: {}", args.file);
    editor
        .open_file(&args.file)
        .map_err(|e| format!("Failed to open file '{}': {}", args.file, e))?;

    let mut store = args.store.as_deref().map(DirectoryStore::new);
    replay(&mut editor, &args.keys, store.as_mut())?;

    if args.html {
        println!("{}", highlighter.borrow().markup());
    } else {
        println!("{}", editor.text());
    }
    let (start, end) = editor.selection().range();
    println!("selection: {start}..{end}");
    eprintln!("{}", counter.borrow().label());

    if args.copy {
        let mut notifications = NotificationManager::new();
        let outcome =
            Copier::system().copy(&editor.text(), CopyTarget::Code, &mut notifications);
        if let Some(notification) = notifications.latest() {
            log::info!("{}", notification.message);
        }
        if outcome == CopyOutcome::Failed {
            return Err("could not copy to the clipboard".to_string());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("{}", message);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toadbin_core::{ChangeEvent, ChangeListener, Selection};

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["--copy", "main.py", "Enter", "S-Tab"]).unwrap();
        assert!(parsed.copy);
        assert!(!parsed.html);
        assert_eq!(parsed.file, "main.py");
        assert_eq!(parsed.keys, vec!["Enter", "S-Tab"]);

        let parsed = args(&["--config", "t.toml", "--store", "out", "a.rs"]).unwrap();
        assert_eq!(parsed.config.as_deref(), Some("t.toml"));
        assert_eq!(parsed.store.as_deref(), Some("out"));
        assert_eq!(parsed.lang, None);

        let parsed = args(&["--lang", "python", "paste"]).unwrap();
        assert_eq!(parsed.lang.as_deref(), Some("python"));
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_replay_undo() {
        let mut editor = Editor::new();
        editor.set_text("print");
        replay(&mut editor, &keys(&["(", "C-z"]), None).unwrap();
        assert_eq!(editor.text(), "print");

        replay(&mut editor, &keys(&["C-y", "x", "C-S-z"]), None).unwrap();
        assert_eq!(editor.text(), "print(x)");
    }

    #[test]
    fn test_replay_rejects_bad_notation() {
        let mut editor = Editor::new();
        assert!(replay(&mut editor, &keys(&["Q-a"]), None).is_err());
    }

    #[test]
    fn test_highlight_listener_choice() {
        let listener = highlight_listener(Some("rust"), Path::new("paste"));
        assert_eq!(listener.language(), Language::Rust);
        let listener = highlight_listener(None, Path::new("main.py"));
        assert_eq!(listener.language(), Language::Python);

        let mut listener = highlight_listener(None, Path::new("paste"));
        listener.on_change(&ChangeEvent {
            text: "{\"id\": 7}",
            selection: Selection::new(0),
            revision: 1,
        });
        assert_eq!(listener.language(), Language::Json);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["--config"]).is_err());
        assert!(args(&["--help"]).is_err());
    }
}
