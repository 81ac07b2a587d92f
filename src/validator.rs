// Semantic validation of the AST: scope, arity, reachability.
//
// Walks the sentence list once, checking SIZE bounds, VIEW presence,
// START reachability and per-rule variable scoping, collecting
// errors and warnings rather than aborting on the first one.

use crate::ast::*;
use log::{error, warn};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    E001,
    E002,
    E003,
    E004,
    W001,
    W002,
    W003,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: Kind,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    fn new(kind: Kind, severity: Severity, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            kind,
            severity,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ValidationResult {
    pub succeeded: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }
}

struct Validator<'a> {
    program: &'a Program,
    diagnostics: Vec<Diagnostic>,
}

pub fn validate(program: &Program) -> ValidationResult {
    let mut v = Validator {
        program,
        diagnostics: Vec::new(),
    };
    v.run();

    let succeeded = !v.diagnostics.iter().any(|d| d.severity == Severity::Error);
    ValidationResult {
        succeeded,
        diagnostics: v.diagnostics,
    }
}

impl<'a> Validator<'a> {
    fn emit(&mut self, kind: Kind, severity: Severity, message: String) {
        match severity {
            Severity::Error => error!("{:?}: {}", kind, message),
            Severity::Warning => warn!("{:?}: {}", kind, message),
        }
        self.diagnostics.push(Diagnostic::new(kind, severity, message));
    }

    fn run(&mut self) {
        if let Some(size) = self.program.size() {
            if size.width <= 0 || size.height <= 0 {
                self.emit(
                    Kind::E001,
                    Severity::Error,
                    "size width and height must both be greater than 0".to_string(),
                );
            }
        }

        if self.program.view().is_none() {
            self.emit(Kind::E002, Severity::Error, "program has no view".to_string());
        }

        let starts = self.program.starts();
        if starts.len() > 1 {
            self.emit(
                Kind::W001,
                Severity::Warning,
                format!("multiple start statements; using last ({})", starts.last().unwrap().name),
            );
        }

        match self.program.start() {
            None => {
                self.emit(Kind::W003, Severity::Warning, "no start statement".to_string());
            }
            Some(start) => {
                if self.program.rule(&start.name).is_none() {
                    self.emit(
                        Kind::E003,
                        Severity::Error,
                        format!("start names undefined rule '{}'", start.name),
                    );
                }
            }
        }

        for sentence in &self.program.sentences {
            if let Sentence::Rule(rule) = sentence.as_ref() {
                self.check_rule(rule);
            }
        }
    }

    fn check_rule(&mut self, rule: &Rule) {
        for sentence in &rule.body {
            self.check_rule_sentence(sentence, &rule.params);
        }
    }

    fn check_rule_sentence(&mut self, sentence: &RuleSentence, params: &[String]) {
        match sentence {
            RuleSentence::Polygon(p) => {
                for point in &p.points {
                    self.check_expr(&point.x, params, None);
                    self.check_expr(&point.y, params, None);
                }
            }
            RuleSentence::Call(c) => {
                if self.program.rule(&c.callee).is_none() {
                    self.emit(
                        Kind::W002,
                        Severity::Warning,
                        format!("call targets undefined rule '{}'", c.callee),
                    );
                }
                for arg in &c.args {
                    self.check_expr(arg, params, None);
                }
            }
            RuleSentence::If(i) => {
                self.check_expr(&i.condition, params, None);
            }
            RuleSentence::Escape(e) => {
                self.check_escape_expr(&e.initial_value, params, &e.variable);
                self.check_escape_expr(&e.recursive_assignment, params, &e.variable);
                self.check_escape_expr(&e.until_condition, params, &e.variable);
            }
            RuleSentence::Transformation(t) => {
                for inner in &t.body {
                    match inner.as_ref() {
                        TransformationSentence::Translate(x, y)
                        | TransformationSentence::Scale(x, y)
                        | TransformationSentence::Shear(x, y) => {
                            self.check_expr(x, params, None);
                            self.check_expr(y, params, None);
                        }
                        TransformationSentence::Rotate(angle) => {
                            self.check_expr(angle, params, None);
                        }
                    }
                }
            }
            RuleSentence::PointsStatement(_) => {}
        }
    }

    fn check_expr(&mut self, expr: &Expression, params: &[String], escape_var: Option<&str>) {
        match expr {
            Expression::Factor(Factor::Variable(name)) => {
                self.check_variable_in_scope(name, params, escape_var);
            }
            Expression::Factor(Factor::NestedExpression(e)) => self.check_expr(e, params, escape_var),
            Expression::Factor(Factor::Range(s, e)) => {
                self.check_expr(s, params, escape_var);
                self.check_expr(e, params, escape_var);
            }
            Expression::Factor(_) => {}
            Expression::AbsoluteValue(e) => self.check_expr(e, params, escape_var),
            Expression::Addition(l, r)
            | Expression::Subtraction(l, r)
            | Expression::Multiplication(l, r)
            | Expression::Division(l, r)
            | Expression::LowerThan(l, r)
            | Expression::GreaterThan(l, r) => {
                self.check_expr(l, params, escape_var);
                self.check_expr(r, params, escape_var);
            }
        }
    }

    fn check_escape_expr(&mut self, expr: &EscapeExpression, params: &[String], escape_var: &str) {
        match expr {
            EscapeExpression::Factor(EscapeFactor::Variable(name)) => {
                self.check_variable_in_scope(name, params, Some(escape_var));
            }
            EscapeExpression::Factor(EscapeFactor::NestedExpression(e)) => {
                self.check_escape_expr(e, params, escape_var)
            }
            EscapeExpression::Factor(EscapeFactor::Range(s, e)) => {
                self.check_escape_expr(s, params, escape_var);
                self.check_escape_expr(e, params, escape_var);
            }
            EscapeExpression::Factor(_) => {}
            EscapeExpression::AbsoluteValue(e) => self.check_escape_expr(e, params, escape_var),
            EscapeExpression::Addition(l, r)
            | EscapeExpression::Subtraction(l, r)
            | EscapeExpression::Multiplication(l, r)
            | EscapeExpression::Division(l, r)
            | EscapeExpression::LowerThan(l, r)
            | EscapeExpression::GreaterThan(l, r) => {
                self.check_escape_expr(l, params, escape_var);
                self.check_escape_expr(r, params, escape_var);
            }
        }
    }

    fn check_variable_in_scope(&mut self, name: &str, params: &[String], escape_var: Option<&str>) {
        if params.iter().any(|p| p == name) {
            return;
        }
        if escape_var == Some(name) {
            return;
        }
        self.emit(
            Kind::E004,
            Severity::Error,
            format!("variable '{}' is not in scope", name),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> Node<Sentence> {
        Node::new(Sentence::View(View {
            x: Range { start: Expression::int(-1), end: Expression::int(1) },
            y: Range { start: Expression::int(-1), end: Expression::int(1) },
        }))
    }

    #[test]
    fn rejects_bad_size() {
        let program = Program::new(vec![
            view(),
            Node::new(Sentence::Size(Size { width: 0, height: 10 })),
        ]);
        let result = validate(&program);
        assert!(!result.succeeded);
        assert!(result.diagnostics.iter().any(|d| d.kind == Kind::E001));
    }

    #[test]
    fn missing_view_is_an_error() {
        let program = Program::new(vec![]);
        let result = validate(&program);
        assert!(!result.succeeded);
        assert!(result.diagnostics.iter().any(|d| d.kind == Kind::E002));
        assert!(result.diagnostics.iter().any(|d| d.kind == Kind::W003));
    }

    #[test]
    fn undefined_start_rule_is_an_error() {
        let program = Program::new(vec![
            view(),
            Node::new(Sentence::Start(Start { name: "Nope".into() })),
        ]);
        let result = validate(&program);
        assert!(!result.succeeded);
        assert!(result.diagnostics.iter().any(|d| d.kind == Kind::E003));
    }

    #[test]
    fn unbound_variable_in_polygon_is_an_error() {
        let polygon = Polygon {
            points: vec![Node::new(Point {
                x: Expression::variable("q"),
                y: Expression::int(0),
            })],
        };
        let rule = Rule {
            name: "R".into(),
            params: vec![],
            body: vec![Node::new(RuleSentence::Polygon(polygon))],
        };
        let program = Program::new(vec![view(), Node::new(Sentence::Rule(rule))]);
        let result = validate(&program);
        assert!(!result.succeeded);
        assert!(result.diagnostics.iter().any(|d| d.kind == Kind::E004));
    }

    #[test]
    fn undefined_call_target_is_only_a_warning() {
        let rule = Rule {
            name: "R".into(),
            params: vec![],
            body: vec![Node::new(RuleSentence::Call(Call {
                callee: "Ghost".into(),
                args: vec![],
            }))],
        };
        let program = Program::new(vec![view(), Node::new(Sentence::Rule(rule))]);
        let result = validate(&program);
        assert!(result.succeeded);
        assert!(result.diagnostics.iter().any(|d| d.kind == Kind::W002));
    }

    #[test]
    fn escape_variable_is_in_scope_for_its_own_node() {
        let escape = Escape {
            initial_value: EscapeExpression::factor(EscapeFactor::IntegerConstant(0)),
            variable: "z".into(),
            recursive_assignment: EscapeExpression::factor(EscapeFactor::Variable("z".into())),
            until_condition: Node::new(EscapeExpression::GreaterThan(
                EscapeExpression::factor(EscapeFactor::Variable("z".into())),
                EscapeExpression::factor(EscapeFactor::IntegerConstant(2)),
            )),
            max_iterations: Some(50),
        };
        let rule = Rule {
            name: "M".into(),
            params: vec![],
            body: vec![Node::new(RuleSentence::Escape(escape))],
        };
        let program = Program::new(vec![view(), Node::new(Sentence::Rule(rule))]);
        let result = validate(&program);
        assert!(result.succeeded);
    }

    #[test]
    fn fully_valid_program_reports_no_errors() {
        let program = Program::new(vec![
            view(),
            Node::new(Sentence::Size(Size { width: 10, height: 10 })),
            Node::new(Sentence::Start(Start { name: "T".into() })),
            Node::new(Sentence::Rule(Rule {
                name: "T".into(),
                params: vec![],
                body: vec![],
            })),
        ]);
        let result = validate(&program);
        assert!(result.succeeded);
        assert_eq!(result.errors().count(), 0);
    }
}
