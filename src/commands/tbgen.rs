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

use crate::commands::helps::tbgen;
use crate::core::lang::vhdl::format::{Config, TbFormat};
use crate::core::lang::vhdl::symbols::entity::Entity;
use crate::core::lang::vhdl::testbench::{self, Testbench};
use crate::error::{Error, Fault, Hint, LastError};
use crate::util::filesystem;
use crate::util::prompt;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help};

#[derive(Debug, PartialEq)]
pub struct Tbgen {
    source: PathBuf,
    target: Option<PathBuf>,
    force: bool,
    json: bool,
    config: Option<PathBuf>,
}

impl Command for Tbgen {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(tbgen::HELP))?;
        Ok(Self {
            // flags
            force: cli.check(Arg::flag("force"))?,
            json: cli.check(Arg::flag("json"))?,
            // options
            config: cli.get(Arg::option("config").value("file"))?,
            // positionals
            source: cli.require(Arg::positional("source"))?,
            target: cli.get(Arg::positional("target"))?,
        })
    }

    fn execute(self) -> proc::Result {
        let fmt = match &self.config {
            Some(path) => Config::from_file(path)?.into_format(),
            None => TbFormat::new(),
        };

        let source = fs::read_to_string(&self.source).map_err(|e| {
            Error::SourceUnreadable(self.source.clone(), LastError(e.to_string()))
        })?;
        let entity = Entity::from_source(&source).map_err(|e| {
            Error::SourceMalformed(
                self.source.clone(),
                LastError(e.to_string()),
                Hint::EntityExpected,
            )
        })?;

        // print as json data
        if self.json == true {
            println!("{}", serde_json::to_string(&entity)?);
            return Ok(());
        }
        self.run(&entity, &source, &fmt)
    }
}

impl Tbgen {
    fn run(&self, entity: &Entity, source: &str, fmt: &TbFormat) -> Result<(), Fault> {
        let name = match testbench::harness_name(entity.get_name(), self.target.as_deref()) {
            Some(n) => n,
            None => {
                return Err(Error::InvalidTargetName(
                    self.target.clone().unwrap_or_default(),
                    Hint::TargetName,
                ))?
            }
        };
        let dest = match &self.target {
            Some(t) => t.clone(),
            None => testbench::default_target(&name),
        };

        if self.force == false && filesystem::is_nonempty_file(&dest) == true {
            if prompt::confirm_overwrite(&dest)? == false {
                println!("info: testbench could not be generated");
                return Ok(());
            }
        }

        let text = Testbench::new(entity, &name, fmt).generate(source);
        filesystem::write_atomic(&dest, &text)
            .map_err(|e| Error::TargetUnwritable(dest.clone(), LastError(e.to_string())))?;

        let missing = entity.count_missing_defaults();
        if missing > 0 {
            println!(
                "{} {} generic(s) without a default value; manual input needed",
                "warning:".yellow(),
                missing
            );
        }
        println!("info: generated testbench file {:?}", dest);
        Ok(())
    }
}
