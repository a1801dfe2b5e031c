// uDashBoard: featherweight dashboard application.
//
// Copyright (C) 2019  Brandon Lewis
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public License
// as published by the Free Software Foundation, either version 3 of
// the License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this program.  If not, see
// <https://www.gnu.org/licenses/>.

use std::env::args;
use std::fs;
use std::io::{self, BufRead, Write};

use forge::evaluator::Evaluator;

const DEFAULT_ARENA_SIZE: usize = 1024;

fn arena_size() -> usize {
    std::env::var("FORGE_ARENA_SIZE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_ARENA_SIZE)
}

fn main() {
    env_logger::init();

    let mut interpreter = Evaluator::new(arena_size());

    match args().nth(1) {
        Some(path) => run_file(&mut interpreter, &path),
        None => run_repl(&mut interpreter),
    }
}

fn run_file(interpreter: &mut Evaluator, path: &str) {
    match fs::read_to_string(path) {
        Ok(source) => {
            if let Err(e) = interpreter.run(&source) {
                println!("Error: {}", e);
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn run_repl(interpreter: &mut Evaluator) {
    println!("Forge Interpreter with Extended Methods (type 'exit' to quit)");
    let stdin = io::stdin();
    loop {
        print!(">> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim() == "exit" {
            break;
        }
        if let Err(e) = interpreter.run(line) {
            println!("Error: {}", e);
        }
    }
}
