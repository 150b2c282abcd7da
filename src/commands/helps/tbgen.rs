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

pub const HELP: &str = r#"Generate a testbench skeleton for a vhdl entity.

Usage:
    tbgen [options] <source> [<target>]

Args:
    <source>            vhdl file declaring the entity under test
    <target>            testbench file to write (default: <entity>_tb.vhd)

Options:
    --force             overwrite an existing target without asking
    --json              print the entity's interface as json and exit
    --config <file>     read testbench formatting from a toml file
    --help, -h          print help information

The testbench entity is named after <target> up to its first '.'.
"#;
