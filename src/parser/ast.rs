// Abstract Syntax Tree for row predicates

/// A single comparison against one column, e.g. `beat_time < 0.55`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column the predicate reads
    pub column: String,
    pub op: CompareOp,
    /// Right-hand side of the comparison
    pub value: Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    /// Only equality makes sense for text operands
    pub fn accepts_text(&self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    pub fn compare_f64(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
        }
    }

    pub fn compare_str(&self, lhs: &str, rhs: &str) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            _ => false,
        }
    }
}

impl Predicate {
    /// Convenience constructor for `column < threshold`
    pub fn less_than(column: &str, threshold: f64) -> Self {
        Self {
            column: column.to_string(),
            op: CompareOp::Lt,
            value: Literal::Number(threshold),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Literal::Number(n) => write!(f, "{} {} {}", self.column, self.op.symbol(), n),
            Literal::Text(s) => write!(f, "{} {} \"{}\"", self.column, self.op.symbol(), s),
        }
    }
}
