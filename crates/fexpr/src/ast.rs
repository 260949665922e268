//! Abstract Syntax Tree (AST) for filter expressions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// A comparison (sign) operator.
///
/// The `Any*` variants are the `?`-prefixed "any/array" forms, meant for
/// matching against multi-valued fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = "~")]
    Like,
    #[serde(rename = "!~")]
    NotLike,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "?=")]
    AnyEq,
    #[serde(rename = "?!=")]
    AnyNeq,
    #[serde(rename = "?~")]
    AnyLike,
    #[serde(rename = "?!~")]
    AnyNotLike,
    #[serde(rename = "?<")]
    AnyLt,
    #[serde(rename = "?<=")]
    AnyLte,
    #[serde(rename = "?>")]
    AnyGt,
    #[serde(rename = "?>=")]
    AnyGte,
}

impl SignOp {
    /// All sixteen sign operators.
    pub const ALL: [SignOp; 16] = [
        SignOp::Eq,
        SignOp::Neq,
        SignOp::Like,
        SignOp::NotLike,
        SignOp::Lt,
        SignOp::Lte,
        SignOp::Gt,
        SignOp::Gte,
        SignOp::AnyEq,
        SignOp::AnyNeq,
        SignOp::AnyLike,
        SignOp::AnyNotLike,
        SignOp::AnyLt,
        SignOp::AnyLte,
        SignOp::AnyGt,
        SignOp::AnyGte,
    ];

    /// Returns the operator as written in a filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignOp::Eq => "=",
            SignOp::Neq => "!=",
            SignOp::Like => "~",
            SignOp::NotLike => "!~",
            SignOp::Lt => "<",
            SignOp::Lte => "<=",
            SignOp::Gt => ">",
            SignOp::Gte => ">=",
            SignOp::AnyEq => "?=",
            SignOp::AnyNeq => "?!=",
            SignOp::AnyLike => "?~",
            SignOp::AnyNotLike => "?!~",
            SignOp::AnyLt => "?<",
            SignOp::AnyLte => "?<=",
            SignOp::AnyGt => "?>",
            SignOp::AnyGte => "?>=",
        }
    }

    /// Looks up an operator by its literal.
    pub fn from_literal(literal: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == literal)
    }

    /// Returns `true` for the `?`-prefixed "any/array" variants.
    pub fn is_any(&self) -> bool {
        self.as_str().starts_with('?')
    }
}

impl fmt::Display for SignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A join operator combining successive items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JoinOp {
    /// `&&`
    #[default]
    #[serde(rename = "&&")]
    And,
    /// `||`
    #[serde(rename = "||")]
    Or,
}

impl JoinOp {
    /// Both join operators.
    pub const ALL: [JoinOp; 2] = [JoinOp::And, JoinOp::Or];

    /// Returns the operator as written in a filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinOp::And => "&&",
            JoinOp::Or => "||",
        }
    }

    /// Looks up an operator by its literal.
    pub fn from_literal(literal: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == literal)
    }
}

impl fmt::Display for JoinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single filter predicate: `left <operator> right`.
///
/// `Comparison::default()` is the empty comparison: no operator and
/// [`Token::Eof`] on both sides. The parser never produces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// Left operand (identifier, number, text or function).
    pub left: Token,
    /// The sign operator, `None` only in the empty comparison.
    pub operator: Option<SignOp>,
    /// Right operand (identifier, number, text or function).
    pub right: Token,
}

impl Comparison {
    /// Creates a comparison from its parts.
    pub fn new(left: Token, operator: SignOp, right: Token) -> Self {
        Self {
            left,
            operator: Some(operator),
            right,
        }
    }

    /// Returns true for the empty comparison.
    ///
    /// Any operator, or any operand other than [`Token::Eof`] (whitespace
    /// included), makes the comparison non-empty.
    pub fn is_empty(&self) -> bool {
        self.operator.is_none() && self.left == Token::Eof && self.right == Token::Eof
    }

    /// Returns the operator text, or `""` for the empty comparison.
    pub fn operator_str(&self) -> &'static str {
        self.operator.map_or("", |op| op.as_str())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {} {}}}", self.left, self.operator_str(), self.right)
    }
}

/// The content of a [`JoinItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinContent {
    /// A plain comparison.
    Comparison(Comparison),
    /// A parenthesized sub-expression.
    Group(Filter),
}

/// One element of a [`Filter`]: a join operator and what it joins.
///
/// The join is the operator that precedes the item; the first item of every
/// sequence uses `&&`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinItem {
    /// The join operator preceding this item.
    pub join: JoinOp,
    /// The comparison or nested group.
    pub content: JoinContent,
}

impl JoinItem {
    /// Creates an item holding a comparison.
    pub fn comparison(join: JoinOp, comparison: Comparison) -> Self {
        Self {
            join,
            content: JoinContent::Comparison(comparison),
        }
    }

    /// Creates an item holding a nested group.
    pub fn group(join: JoinOp, filter: Filter) -> Self {
        Self {
            join,
            content: JoinContent::Group(filter),
        }
    }

    /// Returns the comparison, if this item holds one.
    pub fn as_comparison(&self) -> Option<&Comparison> {
        match &self.content {
            JoinContent::Comparison(c) => Some(c),
            JoinContent::Group(_) => None,
        }
    }

    /// Returns the nested group, if this item holds one.
    pub fn as_group(&self) -> Option<&Filter> {
        match &self.content {
            JoinContent::Group(g) => Some(g),
            JoinContent::Comparison(_) => None,
        }
    }
}

impl fmt::Display for JoinItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            JoinContent::Comparison(c) => write!(f, "{{{} {c}}}", self.join),
            JoinContent::Group(g) => write!(f, "{{{} {g}}}", self.join),
        }
    }
}

/// A parsed filter expression: an ordered sequence of join items.
///
/// Rendered with `Display` in a compact canonical form, for example
/// `[{&& {{identifier a} = {number 1}}} {|| {{number 2} != {number 3}}}]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    items: Vec<JoinItem>,
}

impl Filter {
    /// Creates a filter from its items.
    pub fn new(items: Vec<JoinItem>) -> Self {
        Self { items }
    }

    /// Returns the items in order.
    pub fn items(&self) -> &[JoinItem] {
        &self.items
    }

    /// Returns the number of top-level items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns an iterator over the top-level items.
    pub fn iter(&self) -> std::slice::Iter<'_, JoinItem> {
        self.items.iter()
    }

    /// Returns every comparison in the tree, depth first.
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut out = Vec::new();
        collect_comparisons(self, &mut out);
        out
    }

    /// Returns the deepest group nesting level (0 for a flat filter).
    pub fn depth(&self) -> usize {
        self.items
            .iter()
            .filter_map(JoinItem::as_group)
            .map(|g| g.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn push(&mut self, item: JoinItem) {
        self.items.push(item);
    }
}

fn collect_comparisons<'a>(filter: &'a Filter, out: &mut Vec<&'a Comparison>) {
    for item in filter.iter() {
        match &item.content {
            JoinContent::Comparison(c) => out.push(c),
            JoinContent::Group(g) => collect_comparisons(g, out),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

impl IntoIterator for Filter {
    type Item = JoinItem;
    type IntoIter = std::vec::IntoIter<JoinItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Filter {
    type Item = &'a JoinItem;
    type IntoIter = std::slice::Iter<'a, JoinItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
