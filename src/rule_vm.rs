// Rule VM: resolves rule names, binds actual arguments to formal
// parameters on the scope stack, and walks a rule body, dispatching
// each sentence to the appropriate backend. The base-case mechanism
// for recursion is `If`'s "stop" semantics: a truthy condition
// terminates the *current* rule body immediately.

use crate::ast::{Program, Rule, RuleSentence};
use crate::context::RenderContext;
use crate::escape::run_escape;
use crate::eval::eval_expr;
use crate::ifs::run_ifs;
use crate::raster::draw_polygon;
use log::warn;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct ExecOutcome {
    pub stopped: bool,
}

pub struct RuleVm<'a> {
    program: &'a Program,
}

impl<'a> RuleVm<'a> {
    pub fn new(program: &'a Program) -> RuleVm<'a> {
        RuleVm { program }
    }

    pub fn execute_rule(&self, name: &str, actuals: &[f64], ctx: &mut RenderContext) -> ExecOutcome {
        let rule = match self.program.rule(name) {
            Some(rule) => rule,
            None => {
                warn!("call to undefined rule '{}' ignored", name);
                return ExecOutcome::default();
            }
        };
        self.execute_body(rule, actuals, ctx)
    }

    fn execute_body(&self, rule: &Rule, actuals: &[f64], ctx: &mut RenderContext) -> ExecOutcome {
        let bindings: Vec<(String, f64)> = rule
            .params
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), actuals.get(i).copied().unwrap_or(0.0)))
            .collect();
        let pushed = ctx.push_bindings(bindings);

        let mut outcome = ExecOutcome::default();
        for sentence in &rule.body {
            if self.execute_sentence(sentence, ctx) {
                outcome.stopped = true;
                break;
            }
        }

        ctx.pop_bindings(pushed);
        outcome
    }

    /// Returns `true` if an `If` fired and the body should stop.
    fn execute_sentence(&self, sentence: &RuleSentence, ctx: &mut RenderContext) -> bool {
        match sentence {
            RuleSentence::Polygon(polygon) => {
                draw_polygon(polygon, ctx);
                false
            }
            RuleSentence::Call(call) => {
                // Actuals are evaluated in the caller's scope before any
                // parameter of the callee is bound: `call f(x + 1)` sees
                // the caller's `x`, not the callee's.
                let actuals: Vec<f64> = call.args.iter().map(|a| eval_expr(a, ctx)).collect();
                self.execute_rule(&call.callee, &actuals, ctx);
                false
            }
            RuleSentence::If(if_stmt) => eval_expr(&if_stmt.condition, ctx) != 0.0,
            RuleSentence::Escape(escape) => {
                run_escape(escape, ctx);
                false
            }
            RuleSentence::Transformation(_) => {
                run_ifs(ctx);
                false
            }
            RuleSentence::PointsStatement(points) => {
                ctx.num_points = points.count.max(0) as usize;
                false
            }
        }
    }
}
