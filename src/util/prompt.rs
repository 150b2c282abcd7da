//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use colored::Colorize;
use std::io;
use std::io::{BufRead, Error, Write};
use std::path::Path;

/// Asks if the existing file at `path` may be overwritten.
///
/// Keeps asking until the user answers yes or no. Closing the input counts as
/// a no.
pub fn confirm_overwrite(path: &Path) -> Result<bool, Error> {
    let question = format!(
        "{} output file {:?} already exists and is not empty; overwrite it? [y/n] ",
        "warning:".yellow(),
        path
    );
    ask(&question, &mut io::stdin().lock(), &mut io::stdout())
}

fn ask(question: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool, Error> {
    let mut buffer: String = String::new();
    loop {
        write!(output, "{}", question)?;
        output.flush()?;
        buffer.clear();
        if input.read_line(&mut buffer)? == 0 {
            break Ok(false);
        }
        match check_response(&buffer) {
            Some(r) => break Ok(r),
            None => continue,
        }
    }
}

/// Maps "Y" to `true` and "N" to `false`, ignoring case and the line ending
/// (including windows-style `\r\n`).
fn check_response(line: &str) -> Option<bool> {
    match line.trim_end_matches(&['\r', '\n'][..]).to_uppercase().as_ref() {
        "Y" => Some(true),
        "N" => Some(false),
        _ => None,
    }
}
