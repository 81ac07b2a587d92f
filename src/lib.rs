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

pub mod ast;
pub mod bitmap;
pub mod context;
pub mod escape;
pub mod eval;
pub mod ifs;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod raster;
pub mod rule_vm;
pub mod validator;

use ast::Program;
use context::RenderContext;
use log::info;
use rule_vm::RuleVm;
use validator::ValidationResult;

/// Runs the validator, then (if it reports no errors) interprets the
/// program's `start` rule to completion and returns the rendered
/// bitmap alongside the diagnostics collected along the way.
pub fn render(program: &Program, ctx: &mut RenderContext) -> ValidationResult {
    let result = validator::validate(program);
    if result.succeeded {
        if let Some(start) = program.start() {
            info!("rendering from start rule '{}'", start.name);
            RuleVm::new(program).execute_rule(&start.name, &[], ctx);
        }
    }
    result
}
