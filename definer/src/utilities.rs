use std::io::{self, BufRead, Write};
use std::sync::LazyLock;

use regex::Regex;

static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-]").expect("file name pattern must compile"));

/// Prompts on stdout and reads one line. `None` once stdin is closed.
pub fn input(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    read_line(&mut io::stdin().lock())
}

fn read_line(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

pub fn str_to_bool(mut str: String) -> Option<bool> {
    str.make_ascii_lowercase();
    match str.trim() {
        "y" | "yes" | "yeah" | "yea" | "true" | "on" => Some(true),
        "n" | "no" | "nope" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// `<word>_definitions.json` with anything unsafe in a file name replaced.
pub fn default_output_file(word: &str) -> String {
    format!(
        "{}_definitions.json",
        UNSAFE_FILE_CHARS.replace_all(&word.trim().to_lowercase(), "_")
    )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn answers_parse_loosely() {
        assert_eq!(str_to_bool(" Yes\n".into()), Some(true));
        assert_eq!(str_to_bool("nope".into()), Some(false));
        assert_eq!(str_to_bool("maybe".into()), None);
    }

    #[test]
    fn end_of_input_is_none() {
        let mut reader = Cursor::new("define grace\nq");
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("define grace\n"));
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("q"));
        assert_eq!(read_line(&mut reader).unwrap(), None);
        assert_eq!(read_line(&mut Cursor::new("")).unwrap(), None);
    }

    #[test]
    fn output_file_is_sanitized() {
        assert_eq!(default_output_file("Grace"), "grace_definitions.json");
        assert_eq!(default_output_file("ice cream/2"), "ice_cream_2_definitions.json");
        assert_eq!(default_output_file("well-being"), "well-being_definitions.json");
    }
}
