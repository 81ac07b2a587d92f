// fractile: compiler and interpreter for a declarative 2D fractal
// image language.
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
use std::process::exit;

use anyhow::{Context, Result};
use fractile::context::RenderContext;
use fractile::{parser, printer, validator};

struct Options {
    source_path: String,
    output_path: String,
    dump_ast: bool,
    seed: Option<u64>,
}

fn parse_args() -> Option<Options> {
    let mut positional = Vec::new();
    let mut dump_ast = false;
    let mut seed = None;

    let mut it = args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--dump-ast" => dump_ast = true,
            "--seed" => {
                let value = it.next()?;
                seed = Some(value.parse().ok()?);
            }
            _ => positional.push(arg),
        }
    }

    let source_path = positional.first()?.clone();
    let output_path = positional.get(1).cloned().unwrap_or_else(|| "output.bmp".to_string());
    Some(Options { source_path, output_path, dump_ast, seed })
}

fn run() -> Result<()> {
    let options = parse_args().ok_or_else(|| {
        anyhow::anyhow!("usage: fractile <source.frac> [output.bmp] [--dump-ast] [--seed N]")
    })?;

    let source = std::fs::read_to_string(&options.source_path)
        .with_context(|| format!("reading '{}'", options.source_path))?;

    let program = parser::parse_program(&source).map_err(|e| anyhow::anyhow!("{}", e))?;

    if options.dump_ast {
        println!("{}", printer::print_program(&program));
        return Ok(());
    }

    let result = validator::validate(&program);
    for diagnostic in &result.diagnostics {
        eprintln!("{:?}: {}", diagnostic.severity, diagnostic.message);
    }
    if !result.succeeded {
        anyhow::bail!("program failed validation");
    }

    let mut ctx = match options.seed {
        Some(seed) => RenderContext::with_seed(&program, seed),
        None => RenderContext::new(&program),
    };
    fractile::render(&program, &mut ctx);

    ctx.bitmap
        .save(&options.output_path)
        .with_context(|| format!("writing '{}'", options.output_path))?;
    log::info!("wrote '{}'", options.output_path);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {:#}", err);
        exit(1);
    }
}
