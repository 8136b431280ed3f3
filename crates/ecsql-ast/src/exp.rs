//! The ECSQL expression node
//!
//! [`Exp`] is a thin envelope around [`ExpKind`], the closed set of node
//! kinds. The envelope carries what every node has in common: the value
//! type assigned by the finalize walk, the parentheses flag used when
//! rendering, and the [`ExpId`] the walk assigns in pre-order.

use ecsql_types::{DateTimeComponent, EnumRef, TypeInfo};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::{
    BetweenRangeValueExp, BinaryBooleanExp, BinarySqlOperator, BinaryValueExp, BooleanSqlOperator,
    CastExp, CastTarget, EnumValueExp, FunctionCallExp, IifExp, LikeRhsValueExp, LiteralType,
    LiteralValueExp, MemberFunctionCallExp, ParameterExp, PropertyNameExp, SearchCaseValueExp,
    SqlSetQuantifier, SubqueryExp, TypeListEntry, TypeListExp, UnaryBooleanExp, UnarySqlOperator,
    UnaryValueExp, WhenExp,
};

/// Identifier of a node within one finalized tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExpId(pub u32);

impl fmt::Display for ExpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// All ECSQL expression node kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpKind {
    // === Operators ===
    /// Arithmetic, bitwise or concatenation operation
    BinaryValue(BinaryValueExp),
    /// Unary `+`, `-` or `~`
    UnaryValue(UnaryValueExp),
    /// Comparison, logical, IS, LIKE or BETWEEN predicate
    BinaryBoolean(BinaryBooleanExp),
    /// NOT predicate
    UnaryBoolean(UnaryBooleanExp),
    /// CAST(x AS T)
    Cast(CastExp),

    // === Calls ===
    /// SQL function call
    FunctionCall(FunctionCallExp),
    /// Call of a registered ECSQL member function
    MemberFunctionCall(MemberFunctionCallExp),

    // === Leaves ===
    /// `?` or `:name` placeholder
    Parameter(ParameterExp),
    /// Literal value
    Literal(LiteralValueExp),
    /// Enumerator of a schema enumeration
    EnumValue(EnumValueExp),
    /// Property reference resolved by the host
    PropertyName(PropertyNameExp),
    /// Nested SELECT, opaque to this crate
    Subquery(SubqueryExp),

    // === Predicate operands ===
    /// Right-hand side of LIKE with optional ESCAPE
    LikeRhs(LikeRhsValueExp),
    /// Bounds of BETWEEN
    BetweenRange(BetweenRangeValueExp),
    /// Class list on the right of IS
    TypeList(TypeListExp),

    // === Conditionals ===
    /// IIF(condition, then, else)
    Iif(IifExp),
    /// Searched CASE
    SearchCase(SearchCaseValueExp),
    /// WHEN ... THEN ... clause of a searched CASE
    When(WhenExp),
}

impl ExpKind {
    /// Short name of the node kind, used in logs and diagnostics
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BinaryValue(_) => "BinaryValue",
            Self::UnaryValue(_) => "UnaryValue",
            Self::BinaryBoolean(_) => "BinaryBoolean",
            Self::UnaryBoolean(_) => "UnaryBoolean",
            Self::Cast(_) => "Cast",
            Self::FunctionCall(_) => "FunctionCall",
            Self::MemberFunctionCall(_) => "MemberFunctionCall",
            Self::Parameter(_) => "Parameter",
            Self::Literal(_) => "Literal",
            Self::EnumValue(_) => "EnumValue",
            Self::PropertyName(_) => "PropertyName",
            Self::Subquery(_) => "Subquery",
            Self::LikeRhs(_) => "LikeRhs",
            Self::BetweenRange(_) => "BetweenRange",
            Self::TypeList(_) => "TypeList",
            Self::Iif(_) => "Iif",
            Self::SearchCase(_) => "SearchCase",
            Self::When(_) => "When",
        }
    }

    /// The type a node of this kind has before the finalize walk
    fn initial_type(&self) -> TypeInfo {
        match self {
            Self::Literal(lit) => lit.type_info(),
            Self::EnumValue(value) => TypeInfo::create_enum(value.enum_ref.clone(), false),
            _ => TypeInfo::unset(),
        }
    }
}

/// An ECSQL expression node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exp {
    #[serde(skip)]
    id: Option<ExpId>,
    pub kind: ExpKind,
    #[serde(default)]
    pub has_parentheses: bool,
    #[serde(default)]
    type_info: TypeInfo,
}

impl Exp {
    /// Create a node; literals and enum values get their fixed type
    pub fn new(kind: ExpKind) -> Self {
        let type_info = kind.initial_type();
        Self {
            id: None,
            kind,
            has_parentheses: false,
            type_info,
        }
    }

    pub fn id(&self) -> Option<ExpId> {
        self.id
    }

    pub fn set_id(&mut self, id: ExpId) {
        self.id = Some(id);
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    pub fn set_type_info(&mut self, type_info: TypeInfo) {
        self.type_info = type_info;
    }

    /// Mark the node as written inside parentheses
    pub fn parenthesized(mut self) -> Self {
        self.has_parentheses = true;
        self
    }

    /// Direct children in syntactic order
    pub fn children(&self) -> SmallVec<[&Exp; 4]> {
        let mut out = SmallVec::new();
        match &self.kind {
            ExpKind::BinaryValue(e) => {
                out.push(&*e.lhs);
                out.push(&*e.rhs);
            }
            ExpKind::UnaryValue(e) => out.push(&*e.operand),
            ExpKind::BinaryBoolean(e) => {
                out.push(&*e.lhs);
                out.push(&*e.rhs);
            }
            ExpKind::UnaryBoolean(e) => out.push(&*e.operand),
            ExpKind::Cast(e) => out.push(&*e.operand),
            ExpKind::FunctionCall(e) => out.extend(e.args.iter()),
            ExpKind::MemberFunctionCall(e) => out.extend(e.args.iter()),
            ExpKind::LikeRhs(e) => {
                out.push(&*e.rhs);
                if let Some(escape) = &e.escape {
                    out.push(&**escape);
                }
            }
            ExpKind::BetweenRange(e) => {
                out.push(&*e.lower);
                out.push(&*e.upper);
            }
            ExpKind::Iif(e) => {
                out.push(&*e.condition);
                out.push(&*e.then_exp);
                out.push(&*e.else_exp);
            }
            ExpKind::SearchCase(e) => {
                out.extend(e.when_clauses.iter());
                if let Some(else_exp) = &e.else_exp {
                    out.push(&**else_exp);
                }
            }
            ExpKind::When(e) => {
                out.push(&*e.when);
                out.push(&*e.then);
            }
            ExpKind::Parameter(_)
            | ExpKind::Literal(_)
            | ExpKind::EnumValue(_)
            | ExpKind::PropertyName(_)
            | ExpKind::Subquery(_)
            | ExpKind::TypeList(_) => {}
        }
        out
    }

    /// Direct children in syntactic order, mutably
    pub fn children_mut(&mut self) -> SmallVec<[&mut Exp; 4]> {
        let mut out = SmallVec::new();
        match &mut self.kind {
            ExpKind::BinaryValue(e) => {
                out.push(&mut *e.lhs);
                out.push(&mut *e.rhs);
            }
            ExpKind::UnaryValue(e) => out.push(&mut *e.operand),
            ExpKind::BinaryBoolean(e) => {
                out.push(&mut *e.lhs);
                out.push(&mut *e.rhs);
            }
            ExpKind::UnaryBoolean(e) => out.push(&mut *e.operand),
            ExpKind::Cast(e) => out.push(&mut *e.operand),
            ExpKind::FunctionCall(e) => out.extend(e.args.iter_mut()),
            ExpKind::MemberFunctionCall(e) => out.extend(e.args.iter_mut()),
            ExpKind::LikeRhs(e) => {
                out.push(&mut *e.rhs);
                if let Some(escape) = &mut e.escape {
                    out.push(&mut **escape);
                }
            }
            ExpKind::BetweenRange(e) => {
                out.push(&mut *e.lower);
                out.push(&mut *e.upper);
            }
            ExpKind::Iif(e) => {
                out.push(&mut *e.condition);
                out.push(&mut *e.then_exp);
                out.push(&mut *e.else_exp);
            }
            ExpKind::SearchCase(e) => {
                out.extend(e.when_clauses.iter_mut());
                if let Some(else_exp) = &mut e.else_exp {
                    out.push(&mut **else_exp);
                }
            }
            ExpKind::When(e) => {
                out.push(&mut *e.when);
                out.push(&mut *e.then);
            }
            ExpKind::Parameter(_)
            | ExpKind::Literal(_)
            | ExpKind::EnumValue(_)
            | ExpKind::PropertyName(_)
            | ExpKind::Subquery(_)
            | ExpKind::TypeList(_) => {}
        }
        out
    }

    // === Parameter helpers ===

    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, ExpKind::Parameter(_))
    }

    /// A parameter whose type has not been resolved yet
    pub fn is_unresolved_parameter(&self) -> bool {
        self.is_parameter() && !self.type_info.is_complete()
    }

    pub fn as_parameter(&self) -> Option<&ParameterExp> {
        match &self.kind {
            ExpKind::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_parameter_mut(&mut self) -> Option<&mut ParameterExp> {
        match &mut self.kind {
            ExpKind::Parameter(p) => Some(p),
            _ => None,
        }
    }

    /// Give an unresolved parameter its type and the node it came from
    ///
    /// Returns false (and changes nothing) for anything that is not an
    /// unresolved parameter; a parameter is resolved only once.
    pub fn set_target_exp_info(&mut self, type_info: TypeInfo, source: Option<ExpId>) -> bool {
        if !self.is_unresolved_parameter() {
            return false;
        }
        if let ExpKind::Parameter(p) = &mut self.kind {
            p.target_exp = source;
        }
        self.type_info = type_info;
        true
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(&self.kind, ExpKind::Literal(lit) if lit.literal_type == LiteralType::Null)
    }

    /// Whether this node or any descendant satisfies the predicate
    pub fn contains(&self, pred: &dyn Fn(&Exp) -> bool) -> bool {
        pred(self) || self.children().into_iter().any(|c| c.contains(pred))
    }

    /// Find the node with the given id in this subtree
    pub fn find(&self, id: ExpId) -> Option<&Exp> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.children().into_iter().find_map(|c| c.find(id))
    }

    // === Constructors ===

    pub fn binary(op: BinarySqlOperator, lhs: Exp, rhs: Exp) -> Self {
        Self::new(ExpKind::BinaryValue(BinaryValueExp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }))
    }

    pub fn unary(op: UnarySqlOperator, operand: Exp) -> Self {
        Self::new(ExpKind::UnaryValue(UnaryValueExp {
            op,
            operand: Box::new(operand),
        }))
    }

    pub fn binary_boolean(op: BooleanSqlOperator, lhs: Exp, rhs: Exp) -> Self {
        Self::new(ExpKind::BinaryBoolean(BinaryBooleanExp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }))
    }

    /// NOT operand
    pub fn not(operand: Exp) -> Self {
        Self::new(ExpKind::UnaryBoolean(UnaryBooleanExp {
            operand: Box::new(operand),
        }))
    }

    pub fn cast(operand: Exp, target: CastTarget) -> Self {
        Self::new(ExpKind::Cast(CastExp {
            operand: Box::new(operand),
            target,
        }))
    }

    /// Positional `?` parameter
    pub fn parameter() -> Self {
        Self::new(ExpKind::Parameter(ParameterExp::default()))
    }

    /// Named `:name` parameter
    pub fn named_parameter(name: impl Into<String>) -> Self {
        Self::new(ExpKind::Parameter(ParameterExp {
            name: Some(name.into()),
            ..ParameterExp::default()
        }))
    }

    pub fn literal(literal: LiteralValueExp) -> Self {
        Self::new(ExpKind::Literal(literal))
    }

    pub fn null_literal() -> Self {
        Self::literal(LiteralValueExp::new("NULL", LiteralType::Null))
    }

    /// String literal from its unquoted value
    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::literal(LiteralValueExp::new(value, LiteralType::String))
    }

    pub fn integer_literal(value: i32) -> Self {
        Self::literal(LiteralValueExp::new(value.to_string(), LiteralType::Integer))
    }

    pub fn long_literal(value: i64) -> Self {
        Self::literal(LiteralValueExp::new(value.to_string(), LiteralType::Long))
    }

    /// Double literal from its source text, e.g. `"3.14"`
    pub fn double_literal(raw: impl Into<String>) -> Self {
        Self::literal(LiteralValueExp::new(raw, LiteralType::Double))
    }

    pub fn boolean_literal(value: bool) -> Self {
        let raw = if value { "TRUE" } else { "FALSE" };
        Self::literal(LiteralValueExp::new(raw, LiteralType::Boolean))
    }

    /// DATE, TIME or TIMESTAMP literal from its quoted text
    pub fn date_time_literal(component: DateTimeComponent, raw: impl Into<String>) -> Self {
        let literal_type = match component {
            DateTimeComponent::Date => LiteralType::Date,
            DateTimeComponent::TimeOfDay => LiteralType::Time,
            DateTimeComponent::DateAndTime => LiteralType::Timestamp,
        };
        Self::literal(LiteralValueExp::new(raw, literal_type))
    }

    pub fn iif(condition: Exp, then_exp: Exp, else_exp: Exp) -> Self {
        Self::new(ExpKind::Iif(IifExp {
            condition: Box::new(condition),
            then_exp: Box::new(then_exp),
            else_exp: Box::new(else_exp),
        }))
    }

    /// Searched CASE from `When` nodes and an optional ELSE
    pub fn search_case(when_clauses: Vec<Exp>, else_exp: Option<Exp>) -> Self {
        Self::new(ExpKind::SearchCase(SearchCaseValueExp {
            when_clauses,
            else_exp: else_exp.map(Box::new),
        }))
    }

    pub fn when(when: Exp, then: Exp) -> Self {
        Self::new(ExpKind::When(WhenExp {
            when: Box::new(when),
            then: Box::new(then),
        }))
    }

    pub fn like_rhs(rhs: Exp, escape: Option<Exp>) -> Self {
        Self::new(ExpKind::LikeRhs(LikeRhsValueExp {
            rhs: Box::new(rhs),
            escape: escape.map(Box::new),
        }))
    }

    pub fn between_range(lower: Exp, upper: Exp) -> Self {
        Self::new(ExpKind::BetweenRange(BetweenRangeValueExp {
            lower: Box::new(lower),
            upper: Box::new(upper),
        }))
    }

    pub fn function_call(
        name: impl Into<String>,
        set_quantifier: Option<SqlSetQuantifier>,
        args: Vec<Exp>,
    ) -> Self {
        Self::new(ExpKind::FunctionCall(FunctionCallExp {
            name: name.into(),
            set_quantifier,
            args,
            is_getter: false,
        }))
    }

    /// Niladic keyword function such as CURRENT_TIMESTAMP, rendered without parentheses
    pub fn getter(name: impl Into<String>) -> Self {
        Self::new(ExpKind::FunctionCall(FunctionCallExp {
            name: name.into(),
            set_quantifier: None,
            args: Vec::new(),
            is_getter: true,
        }))
    }

    /// Member function call without arguments; add them with
    /// [`MemberFunctionCallExp::add_argument`]
    pub fn member_function_call(name: impl Into<String>, table_valued: bool) -> Self {
        Self::new(ExpKind::MemberFunctionCall(MemberFunctionCallExp::new(
            name,
            table_valued,
        )))
    }

    pub fn enum_value(enum_ref: EnumRef, enumerator: impl Into<String>) -> Self {
        Self::new(ExpKind::EnumValue(EnumValueExp {
            enum_ref,
            enumerator: enumerator.into(),
        }))
    }

    /// Property path with the type the host resolved for it
    pub fn property_name<S: Into<String>>(
        path: impl IntoIterator<Item = S>,
        property_type: TypeInfo,
    ) -> Self {
        Self::new(ExpKind::PropertyName(PropertyNameExp {
            path: path.into_iter().map(Into::into).collect(),
            property_type,
        }))
    }

    /// Subquery from its ECSQL text and the type of its single column
    pub fn subquery(ecsql: impl Into<String>, result_type: TypeInfo) -> Self {
        Self::new(ExpKind::Subquery(SubqueryExp {
            ecsql: ecsql.into(),
            result_type,
        }))
    }

    pub fn type_list(classes: Vec<TypeListEntry>) -> Self {
        Self::new(ExpKind::TypeList(TypeListExp { classes }))
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ecsql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsql_types::PrimitiveType;

    fn sample() -> Exp {
        Exp::binary(
            BinarySqlOperator::Plus,
            Exp::integer_literal(1),
            Exp::function_call("abs", None, vec![Exp::parameter(), Exp::null_literal()]),
        )
    }

    #[test]
    fn test_literal_type_fixed_at_construction() {
        assert!(Exp::integer_literal(3).type_info().is_exact_numeric());
        assert!(Exp::string_literal("x").type_info().is_string());
        assert!(Exp::null_literal().type_info().is_null());
        assert!(Exp::parameter().type_info().is_unset());
        assert!(sample().type_info().is_unset());
    }

    #[test]
    fn test_children_in_syntactic_order() {
        let exp = sample();
        let children = exp.children();
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0].kind, ExpKind::Literal(_)));
        assert_eq!(children[1].children().len(), 2);
        assert!(children[1].children()[0].is_parameter());
    }

    #[test]
    fn test_contains_searches_descendants() {
        let exp = sample();
        assert!(exp.contains(&|e| e.is_parameter()));
        assert!(exp.contains(&|e| e.is_null_literal()));
        assert!(!exp.contains(&|e| matches!(e.kind, ExpKind::Subquery(_))));
    }

    #[test]
    fn test_set_target_exp_info_only_once() {
        let mut param = Exp::parameter();
        let long = TypeInfo::create_primitive(PrimitiveType::Long);
        assert!(param.set_target_exp_info(long.clone(), Some(ExpId(4))));
        assert_eq!(param.as_parameter().unwrap().target_exp, Some(ExpId(4)));

        let string = TypeInfo::create_primitive(PrimitiveType::String);
        assert!(!param.set_target_exp_info(string, None));
        assert_eq!(param.type_info(), &long);

        let mut literal = Exp::integer_literal(1);
        assert!(!literal.set_target_exp_info(TypeInfo::null(), None));
    }

    #[test]
    fn test_find_by_id() {
        let mut exp = sample();
        exp.set_id(ExpId(0));
        exp.children_mut()[1].set_id(ExpId(2));
        assert!(exp.find(ExpId(2)).is_some_and(|e| matches!(e.kind, ExpKind::FunctionCall(_))));
        assert!(exp.find(ExpId(9)).is_none());
    }

    #[test]
    fn test_json_round_trip_keeps_shape() {
        let exp = sample().parenthesized();
        let json = serde_json::to_string(&exp).unwrap();
        let back: Exp = serde_json::from_str(&json).unwrap();
        assert!(back.has_parentheses);
        assert_eq!(back.to_ecsql(), exp.to_ecsql());
    }
}
