//! Canonical, renaming-invariant encodings of ruleset statements.
//!
//! Every statement is rendered three times into shape-identical trees that
//! differ only in how constants outside the reserved vocabulary appear:
//!
//! - `zero_sig`: as [`SigValue::Unseen`], so only structure remains
//! - `num_sig`: as a [`SyntheticId`] handed out in feed order
//! - `value_sig`: as the constant itself
//!
//! Variables are numbered per statement in first-occurrence order and roles
//! are rendered by registration index, so all three encodings are invariant
//! under variable renaming.

use crate::error::ConstructionError;
use crate::statement::{Fact, Literal, Rule};
use common::compute_fp;
use parser::{Symbol, Term};
use std::collections::HashMap;
use std::fmt;

/// The ten keywords every GDL ruleset is organised around, in feed order.
pub const ROOT_KEYWORDS: [&str; 10] = [
    "role", "init", "base", "input", "true", "next", "legal", "terminal", "does", "goal",
];

const CONNECTIVES: [&str; 3] = ["not", "or", "distinct"];

/// Numerals below this bound are reserved and never abstracted.
const NUMERAL_LIMIT: u32 = 1000;

/// An abstract stand-in for a constant, assigned in first-encounter order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SyntheticId(u32);

impl SyntheticId {
    /// The first id handed out by a run.
    pub const FIRST: u32 = 100;

    /// Wrap a raw id; `None` if it is below [`SyntheticId::FIRST`].
    #[must_use]
    pub fn new(raw: u32) -> Option<Self> {
        (raw >= Self::FIRST).then_some(Self(raw))
    }

    #[must_use]
    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SyntheticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SyntheticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// One node of a canonical encoding.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum SigValue {
    /// Structural tag: `fact`, `rule`, `function`, `not`, `distinct`, `or`.
    Tag(&'static str),
    /// Reserved token kept verbatim (root keyword, connective, small numeral).
    Reserved(Term),
    /// Registered role, by registration index.
    Role(usize),
    /// Statement-local variable number, starting at 1.
    Var(usize),
    /// Constant with its identity discarded.
    Unseen,
    /// Constant replaced by its synthetic id.
    Synthetic(SyntheticId),
    /// Constant kept as is.
    Value(Term),
    Tuple(Vec<SigValue>),
}

impl fmt::Display for SigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::Reserved(t) | Self::Value(t) => write!(f, "{t}"),
            Self::Role(i) => write!(f, "role{i}"),
            Self::Var(n) => write!(f, "?{n}"),
            Self::Unseen => write!(f, "0"),
            Self::Synthetic(id) => write!(f, "#{id}"),
            Self::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for SigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The three encodings of one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    statement: String,
    zero_sig: SigValue,
    zero_sig_hash: u64,
    num_sig: SigValue,
    value_sig: SigValue,
}

impl Signature {
    /// Assemble a signature; the zero hash is derived from `zero_sig`.
    #[must_use]
    pub fn new(
        statement: String,
        zero_sig: SigValue,
        num_sig: SigValue,
        value_sig: SigValue,
    ) -> Self {
        let zero_sig_hash = compute_fp(&zero_sig);
        Self {
            statement,
            zero_sig,
            zero_sig_hash,
            num_sig,
            value_sig,
        }
    }

    /// Source form of the statement, for diagnostics.
    #[must_use]
    #[inline]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    #[must_use]
    #[inline]
    pub fn zero_sig(&self) -> &SigValue {
        &self.zero_sig
    }

    /// Structural-equivalence-class key of the statement.
    #[must_use]
    #[inline]
    pub fn zero_sig_hash(&self) -> u64 {
        self.zero_sig_hash
    }

    #[must_use]
    #[inline]
    pub fn num_sig(&self) -> &SigValue {
        &self.num_sig
    }

    #[must_use]
    #[inline]
    pub fn value_sig(&self) -> &SigValue {
        &self.value_sig
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [zero: 0x{:016x}]", self.num_sig, self.zero_sig_hash)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Rendering {
    Zero,
    Numbered,
    Valued,
}

/// Per-statement variable numbering, shared by the three renderings.
#[derive(Default)]
struct VariableTable {
    ids: HashMap<Term, usize>,
}

impl VariableTable {
    fn get(&mut self, t: &Term) -> usize {
        let next = self.ids.len() + 1;
        *self.ids.entry(t.clone()).or_insert(next)
    }
}

/// Whether `t` belongs to the vocabulary that is never abstracted.
#[must_use]
pub fn is_reserved(t: &Term) -> bool {
    let name = t.name();
    if ROOT_KEYWORDS.contains(&name) || CONNECTIVES.contains(&name) {
        return true;
    }
    name.parse::<u32>().is_ok_and(|n| n < NUMERAL_LIMIT && n.to_string() == name)
}

/// Encodes the statements of one ruleset, in feed order.
///
/// Synthetic ids and role indices depend on the order statements are added;
/// two runs are only comparable when fed in the same canonical order.
#[derive(Debug, Default)]
pub struct SignatureFactory {
    roles: HashMap<Term, usize>,
    role_order: Vec<Term>,
    synthetic: HashMap<Term, SyntheticId>,
    signatures: Vec<Signature>,
}

impl SignatureFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a fact; `role` facts register their argument first.
    pub fn add_fact(&mut self, fact: &Fact) -> Result<(), ConstructionError> {
        if fact.head().is("role") {
            match fact.body() {
                [Symbol::Term(role)] => self.register_role(role),
                _ => return Err(ConstructionError::MalformedRole(fact.to_string())),
            }
        }

        let mut vars = VariableTable::default();
        let zero_sig = self.encode_fact(fact, &mut vars, Rendering::Zero)?;
        let num_sig = self.encode_fact(fact, &mut vars, Rendering::Numbered)?;
        let value_sig = self.encode_fact(fact, &mut vars, Rendering::Valued)?;

        self.signatures
            .push(Signature::new(fact.to_string(), zero_sig, num_sig, value_sig));
        Ok(())
    }

    /// Encode a rule.
    pub fn add_rule(&mut self, rule: &Rule) -> Result<(), ConstructionError> {
        let mut vars = VariableTable::default();
        let zero_sig = self.encode_rule(rule, &mut vars, Rendering::Zero)?;
        let num_sig = self.encode_rule(rule, &mut vars, Rendering::Numbered)?;
        let value_sig = self.encode_rule(rule, &mut vars, Rendering::Valued)?;

        self.signatures
            .push(Signature::new(rule.to_string(), zero_sig, num_sig, value_sig));
        Ok(())
    }

    #[must_use]
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Freeze the run.
    #[must_use]
    pub fn finish(self) -> SignatureRun {
        SignatureRun {
            signatures: self.signatures,
            roles: self.role_order,
            synthetic_count: self.synthetic.len(),
        }
    }

    fn register_role(&mut self, role: &Term) {
        if !self.roles.contains_key(role) {
            self.roles.insert(role.clone(), self.role_order.len());
            self.role_order.push(role.clone());
        }
    }

    fn synthetic_id(&mut self, t: &Term) -> SyntheticId {
        let next = SyntheticId(SyntheticId::FIRST + self.synthetic.len() as u32);
        *self.synthetic.entry(t.clone()).or_insert(next)
    }

    fn encode_fact(
        &mut self,
        fact: &Fact,
        vars: &mut VariableTable,
        mode: Rendering,
    ) -> Result<SigValue, ConstructionError> {
        let head = self.render_term(fact.head(), vars, mode);
        let body = fact
            .body()
            .iter()
            .map(|s| self.render_symbol(s, vars, mode))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SigValue::Tuple(vec![
            SigValue::Tag("fact"),
            head,
            SigValue::Tuple(body),
        ]))
    }

    fn encode_rule(
        &mut self,
        rule: &Rule,
        vars: &mut VariableTable,
        mode: Rendering,
    ) -> Result<SigValue, ConstructionError> {
        let head = self.render_literal(rule.head(), vars, mode)?;
        let body = rule
            .body()
            .iter()
            .map(|l| self.render_literal(l, vars, mode))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SigValue::Tuple(vec![
            SigValue::Tag("rule"),
            head,
            SigValue::Tuple(body),
        ]))
    }

    fn render_literal(
        &mut self,
        lit: &Literal,
        vars: &mut VariableTable,
        mode: Rendering,
    ) -> Result<SigValue, ConstructionError> {
        Ok(match lit {
            Literal::Single(t) => self.render_term(t, vars, mode),
            Literal::Not(inner) => SigValue::Tuple(vec![
                SigValue::Tag("not"),
                self.render_literal(inner, vars, mode)?,
            ]),
            Literal::Distinct(lhs, rhs) => SigValue::Tuple(vec![
                SigValue::Tag("distinct"),
                self.render_symbol(lhs, vars, mode)?,
                self.render_symbol(rhs, vars, mode)?,
            ]),
            Literal::Or(body) => {
                let mut items = Vec::with_capacity(body.len() + 1);
                items.push(SigValue::Tag("or"));
                for l in body {
                    items.push(self.render_literal(l, vars, mode)?);
                }
                SigValue::Tuple(items)
            }
            Literal::Compound(c) => SigValue::Tuple(
                c.iter()
                    .map(|s| self.render_symbol(s, vars, mode))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }

    fn render_symbol(
        &mut self,
        symbol: &Symbol,
        vars: &mut VariableTable,
        mode: Rendering,
    ) -> Result<SigValue, ConstructionError> {
        match symbol {
            Symbol::Term(t) => Ok(self.render_term(t, vars, mode)),
            Symbol::List(list) => {
                if !list.is_function() {
                    return Err(ConstructionError::NotAFunction(list.to_string()));
                }
                let items = list
                    .iter()
                    .map(|s| self.render_symbol(s, vars, mode))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SigValue::Tuple(vec![
                    SigValue::Tag("function"),
                    SigValue::Tuple(items),
                ]))
            }
        }
    }

    fn render_term(&mut self, t: &Term, vars: &mut VariableTable, mode: Rendering) -> SigValue {
        if let Some(&index) = self.roles.get(t) {
            return SigValue::Role(index);
        }
        if is_reserved(t) {
            return SigValue::Reserved(t.clone());
        }
        if t.is_variable() {
            return SigValue::Var(vars.get(t));
        }
        match mode {
            Rendering::Zero => SigValue::Unseen,
            Rendering::Numbered => SigValue::Synthetic(self.synthetic_id(t)),
            Rendering::Valued => SigValue::Value(t.clone()),
        }
    }
}

/// The frozen result of encoding one ruleset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRun {
    signatures: Vec<Signature>,
    roles: Vec<Term>,
    synthetic_count: usize,
}

impl SignatureRun {
    /// Signatures in feed order.
    #[must_use]
    #[inline]
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Role terms in registration order; index `i` is rendered `role<i>`.
    #[must_use]
    #[inline]
    pub fn roles(&self) -> &[Term] {
        &self.roles
    }

    #[must_use]
    pub fn role(&self, index: usize) -> Option<&Term> {
        self.roles.get(index)
    }

    /// Number of distinct constants that received a synthetic id.
    #[must_use]
    #[inline]
    pub fn synthetic_count(&self) -> usize {
        self.synthetic_count
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
