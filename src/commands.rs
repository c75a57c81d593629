//! Line commands understood by the interactive reader.

use log::debug;

use crate::error::{Error, Result};
use crate::input::{parse_number, parse_reference};
use crate::playback::MediaElement;
use crate::reader::ReaderSession;
use crate::types::Language;

pub const HELP: &str = "\
next | prev            move one verse (n / p)
play | pause           control the recitation (space toggles)
seek <seconds>         jump inside the current verse
loop                   repeat the current verse
surah <name|number>    open a surah at verse 1
verse <n>              jump to a verse of this surah
goto <surah:verse>     jump anywhere, e.g. goto 2:255
lang <en|ur>           translation language
qari <id>              reciter (see `tilawah reciters`)
bookmark               bookmark the current verse
reset                  back to Al-Fatihah 1:1
continue | cancel      answer the next-verse prompt
status                 show where you are
quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Previous,
    Play,
    Pause,
    Toggle,
    Seek(f64),
    Loop,
    Surah(String),
    Verse(u32),
    GoTo(String),
    Language(Language),
    Reciter(u32),
    Bookmark,
    Reset,
    Continue,
    Cancel,
    Status,
    Help,
    Quit,
}

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowStatus,
    ShowHelp,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        // A lone space toggles playback, like the space key in the web player.
        if line == " " {
            return Ok(Command::Toggle);
        }
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (line, ""),
        };
        let require = |what: &str| require_arg(word, arg, what);

        let command = match word.to_lowercase().as_str() {
            "n" | "next" => Command::Next,
            "p" | "prev" | "previous" => Command::Previous,
            "play" => Command::Play,
            "pause" => Command::Pause,
            "toggle" => Command::Toggle,
            "seek" => {
                let seconds: f64 = require("seconds")?
                    .parse()
                    .map_err(|_| Error::invalid("Please enter a valid time in seconds"))?;
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(Error::invalid("Please enter a valid time in seconds"));
                }
                Command::Seek(seconds)
            }
            "loop" => Command::Loop,
            "surah" | "s" => Command::Surah(require("name or number")?.to_string()),
            "verse" | "v" => Command::Verse(parse_number(require("number")?, "verse")?),
            "goto" | "g" => Command::GoTo(require("surah:verse")?.to_string()),
            "lang" | "language" => Command::Language(require("en|ur")?.parse()?),
            "qari" | "reciter" => Command::Reciter(parse_number(require("id")?, "reciter")?),
            "bookmark" | "b" => Command::Bookmark,
            "reset" => Command::Reset,
            "continue" | "c" | "yes" | "y" => Command::Continue,
            "cancel" | "no" => Command::Cancel,
            "status" | "" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(Error::invalid(format!("Unknown command '{}'. Type help.", other))),
        };
        debug!("Parsed command {:?}", command);
        Ok(command)
    }
}

fn require_arg<'a>(word: &str, arg: &'a str, what: &str) -> Result<&'a str> {
    if arg.is_empty() {
        Err(Error::invalid(format!("Usage: {} <{}>", word, what)))
    } else {
        Ok(arg)
    }
}

pub fn execute<M: MediaElement>(session: &mut ReaderSession<M>, command: Command) -> Result<Flow> {
    match command {
        Command::Next => {
            session.next();
        }
        Command::Previous => {
            session.previous();
        }
        Command::Play => session.play(),
        Command::Pause => session.pause(),
        Command::Toggle => session.toggle_audio(),
        Command::Seek(seconds) => session.seek(seconds),
        Command::Loop => {
            session.toggle_loop();
            return Ok(Flow::ShowStatus);
        }
        Command::Surah(name) => {
            session.set_chapter(&name);
        }
        Command::Verse(verse) => {
            session.set_verse(verse);
        }
        Command::GoTo(reference) => {
            let verse = parse_reference(&reference)?;
            session.go_to(verse);
        }
        Command::Language(language) => {
            session.set_language(language);
        }
        Command::Reciter(id) => {
            session.set_reciter(id);
        }
        Command::Bookmark => {
            session.add_bookmark();
        }
        Command::Reset => {
            session.reset();
        }
        Command::Continue => {
            if !session.confirm_advance() {
                return Err(Error::invalid("There is no next-verse prompt to answer"));
            }
        }
        Command::Cancel => {
            session.cancel_advance();
        }
        Command::Status => return Ok(Flow::ShowStatus),
        Command::Help => return Ok(Flow::ShowHelp),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
