//! Permissive argument handling.
//!
//! Unrecognized flags and stray words are dropped before clap sees the
//! command line, so `resume-pdf --hr --verbose` behaves like
//! `resume-pdf --hr`.

use clap::Command;
use std::collections::HashMap;
use std::ffi::OsString;

/// Keep only the arguments `command` knows about.
///
/// The first item (the program name) is always kept. A recognized option
/// that takes a value keeps its following argument unless the value was
/// given inline as `--flag=value`.
pub fn retain_known<I, T>(command: &Command, args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut command = command.clone();
    command.build();

    let mut known: HashMap<String, bool> = HashMap::new();
    for arg in command.get_arguments() {
        let takes_value = arg.get_action().takes_values();
        if let Some(long) = arg.get_long() {
            known.insert(format!("--{}", long), takes_value);
        }
        if let Some(short) = arg.get_short() {
            known.insert(format!("-{}", short), takes_value);
        }
    }

    let mut args = args.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let text = arg.to_string_lossy().into_owned();
        let (name, inline_value) = match text.split_once('=') {
            Some((name, _)) => (name, true),
            None => (text.as_str(), false),
        };

        match known.get(name) {
            Some(&takes_value) => {
                kept.push(arg);
                if takes_value && !inline_value {
                    if let Some(value) = args.next() {
                        kept.push(value);
                    }
                }
            }
            None => log::debug!("Ignoring unrecognized argument {}", text),
        }
    }

    kept
}
