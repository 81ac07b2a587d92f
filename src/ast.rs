// Abstract Syntax Tree for the fractal description language.
//
// Every node is single-owned and reachable from a unique `Program`
// root; there are no cycles and no back-pointers. Nodes are `Rc`
// wrapped (alias `Node<T>`) so the tree can be handed around and
// cloned cheaply by the validator and interpreter without the owner
// ever changing — sharing is never actually exercised, only allowed.

use std::rc::Rc;

/// Abstract over node ownership: every AST node lives behind a `Node`.
pub type Node<T> = Rc<T>;
/// An ordered, owned sequence of nodes.
pub type Seq<T> = Vec<Node<T>>;

#[derive(Clone, Debug, PartialEq)]
pub enum Factor {
    IntegerConstant(i64),
    DoubleConstant(f64),
    Variable(String),
    NestedExpression(Node<Expression>),
    XPixelCoord,
    YPixelCoord,
    Range(Node<Expression>, Node<Expression>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Addition(Node<Expression>, Node<Expression>),
    Subtraction(Node<Expression>, Node<Expression>),
    Multiplication(Node<Expression>, Node<Expression>),
    Division(Node<Expression>, Node<Expression>),
    LowerThan(Node<Expression>, Node<Expression>),
    GreaterThan(Node<Expression>, Node<Expression>),
    AbsoluteValue(Node<Expression>),
    Factor(Factor),
}

impl Expression {
    pub fn factor(f: Factor) -> Node<Expression> {
        Node::new(Expression::Factor(f))
    }

    pub fn int(v: i64) -> Node<Expression> {
        Self::factor(Factor::IntegerConstant(v))
    }

    pub fn double(v: f64) -> Node<Expression> {
        Self::factor(Factor::DoubleConstant(v))
    }

    pub fn variable(name: impl Into<String>) -> Node<Expression> {
        Self::factor(Factor::Variable(name.into()))
    }
}

/// `EscapeExpression`/`EscapeFactor` mirror `Expression`/`Factor`
/// exactly, but are kept as distinct types: the escape block's
/// initial value, recursive assignment and until-condition are
/// evaluated in a scope that additionally shadows outer names with
/// the escape's own iteration variable, which the evaluator in
/// `eval.rs` needs to know statically.
#[derive(Clone, Debug, PartialEq)]
pub enum EscapeFactor {
    IntegerConstant(i64),
    DoubleConstant(f64),
    Variable(String),
    NestedExpression(Node<EscapeExpression>),
    XPixelCoord,
    YPixelCoord,
    Range(Node<EscapeExpression>, Node<EscapeExpression>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum EscapeExpression {
    Addition(Node<EscapeExpression>, Node<EscapeExpression>),
    Subtraction(Node<EscapeExpression>, Node<EscapeExpression>),
    Multiplication(Node<EscapeExpression>, Node<EscapeExpression>),
    Division(Node<EscapeExpression>, Node<EscapeExpression>),
    LowerThan(Node<EscapeExpression>, Node<EscapeExpression>),
    GreaterThan(Node<EscapeExpression>, Node<EscapeExpression>),
    AbsoluteValue(Node<EscapeExpression>),
    Factor(EscapeFactor),
}

impl EscapeExpression {
    pub fn factor(f: EscapeFactor) -> Node<EscapeExpression> {
        Node::new(EscapeExpression::Factor(f))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Range {
    pub start: Node<Expression>,
    pub end: Node<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub x: Range,
    pub y: Range,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Size {
    pub width: i64,
    pub height: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Color {
    pub start: String,
    pub end: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Start {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub x: Node<Expression>,
    pub y: Node<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub points: Seq<Point>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub callee: String,
    pub args: Seq<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct If {
    pub condition: Node<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Escape {
    pub initial_value: Node<EscapeExpression>,
    pub variable: String,
    pub recursive_assignment: Node<EscapeExpression>,
    pub until_condition: Node<EscapeExpression>,
    /// `None` when the `N iterations;` clause is absent; the evaluator
    /// falls back to `context::DEFAULT_MAX_ITERATIONS`.
    pub max_iterations: Option<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TransformationSentence {
    Translate(Node<Expression>, Node<Expression>),
    Scale(Node<Expression>, Node<Expression>),
    Rotate(Node<Expression>),
    Shear(Node<Expression>, Node<Expression>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transformation {
    pub probability: i64,
    pub body: Seq<TransformationSentence>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointsStatement {
    pub count: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RuleSentence {
    Polygon(Polygon),
    Call(Call),
    If(If),
    Escape(Escape),
    Transformation(Transformation),
    PointsStatement(PointsStatement),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub name: String,
    pub params: Vec<String>,
    pub body: Seq<RuleSentence>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Sentence {
    View(View),
    Size(Size),
    Color(Color),
    Start(Start),
    Rule(Rule),
    Expression(Node<Expression>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub sentences: Seq<Sentence>,
}

impl Program {
    pub fn new(sentences: Seq<Sentence>) -> Program {
        Program { sentences }
    }

    pub fn view(&self) -> Option<&View> {
        self.sentences.iter().find_map(|s| match s.as_ref() {
            Sentence::View(v) => Some(v),
            _ => None,
        })
    }

    pub fn size(&self) -> Option<&Size> {
        self.sentences.iter().find_map(|s| match s.as_ref() {
            Sentence::Size(v) => Some(v),
            _ => None,
        })
    }

    pub fn color(&self) -> Option<&Color> {
        self.sentences.iter().find_map(|s| match s.as_ref() {
            Sentence::Color(v) => Some(v),
            _ => None,
        })
    }

    /// Last `Start` in source order wins (W001).
    pub fn start(&self) -> Option<&Start> {
        self.sentences
            .iter()
            .filter_map(|s| match s.as_ref() {
                Sentence::Start(v) => Some(v),
                _ => None,
            })
            .last()
    }

    pub fn starts(&self) -> Vec<&Start> {
        self.sentences
            .iter()
            .filter_map(|s| match s.as_ref() {
                Sentence::Start(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.sentences.iter().find_map(|s| match s.as_ref() {
            Sentence::Rule(r) if r.name == name => Some(r),
            _ => None,
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.sentences.iter().filter_map(|s| match s.as_ref() {
            Sentence::Rule(r) => Some(r),
            _ => None,
        })
    }
}

/// Release every node reachable from `program`. A no-op on `None`.
///
/// `Rc`'s `Drop` already walks the tree; this exists so callers
/// embedding the interpreter from a non-Rust host have a single,
/// explicit teardown call that matches the AST's documented
/// lifecycle rather than relying on scope-exit.
pub fn destroy_program(program: Option<Program>) {
    drop(program)
}
