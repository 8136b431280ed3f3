//! Rendering expression trees back to ECSQL text

use crate::{Exp, ExpKind, LiteralType, LiteralValueExp, ParameterExp};

/// How positional parameters are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// Positional parameters render as `?`
    #[default]
    Default,
    /// Positional parameters render as `:_ecsql_param_ix<index>`
    GenerateNameForUnnamedParameter,
}

/// Prefix of the generated name of a positional parameter
pub const GENERATED_PARAMETER_PREFIX: &str = "_ecsql_param_ix";

/// Output buffer and settings of a render walk
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    mode: RenderMode,
    buf: String,
}

impl RenderContext {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            buf: String::new(),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Exp {
    /// Canonical ECSQL text with positional parameters as `?`
    pub fn to_ecsql(&self) -> String {
        self.to_ecsql_with(RenderMode::Default)
    }

    pub fn to_ecsql_with(&self, mode: RenderMode) -> String {
        let mut ctx = RenderContext::new(mode);
        self.render(&mut ctx);
        ctx.into_string()
    }

    /// Append this node's ECSQL text to the context
    pub fn render(&self, ctx: &mut RenderContext) {
        if self.has_parentheses {
            ctx.push_str("(");
        }
        self.render_kind(ctx);
        if self.has_parentheses {
            ctx.push_str(")");
        }
    }

    fn render_kind(&self, ctx: &mut RenderContext) {
        match &self.kind {
            ExpKind::BinaryValue(e) => {
                e.lhs.render(ctx);
                ctx.push_str(" ");
                ctx.push_str(e.op.symbol());
                ctx.push_str(" ");
                e.rhs.render(ctx);
            }
            ExpKind::UnaryValue(e) => {
                ctx.push_str(e.op.symbol());
                let mut operand = RenderContext::new(ctx.mode());
                e.operand.render(&mut operand);
                let operand = operand.into_string();
                // `--` would open a line comment
                if operand.starts_with(['-', '+']) {
                    ctx.push_str(" ");
                }
                ctx.push_str(&operand);
            }
            ExpKind::BinaryBoolean(e) => {
                e.lhs.render(ctx);
                ctx.push_str(" ");
                ctx.push_str(e.op.symbol());
                ctx.push_str(" ");
                e.rhs.render(ctx);
            }
            ExpKind::UnaryBoolean(e) => {
                ctx.push_str("NOT ");
                e.operand.render(ctx);
            }
            ExpKind::Cast(e) => {
                ctx.push_str("CAST(");
                e.operand.render(ctx);
                ctx.push_str(" AS ");
                ctx.push_str(&e.target.to_string());
                ctx.push_str(")");
            }
            ExpKind::FunctionCall(e) => {
                ctx.push_str(&e.name);
                if e.is_getter {
                    return;
                }
                ctx.push_str("(");
                if let Some(quantifier) = e.set_quantifier {
                    ctx.push_str(quantifier.keyword());
                    ctx.push_str(" ");
                }
                render_list(ctx, &e.args);
                ctx.push_str(")");
            }
            ExpKind::MemberFunctionCall(e) => {
                ctx.push_str(&e.name);
                ctx.push_str("(");
                render_list(ctx, &e.args);
                ctx.push_str(")");
            }
            ExpKind::Parameter(p) => render_parameter(ctx, p),
            ExpKind::Literal(lit) => render_literal(ctx, lit),
            ExpKind::EnumValue(e) => {
                ctx.push_str(&e.enum_ref.key.to_string());
                ctx.push_str(".");
                ctx.push_str(&e.enumerator);
            }
            ExpKind::PropertyName(p) => ctx.push_str(&p.path.join(".")),
            ExpKind::Subquery(s) => {
                ctx.push_str("(");
                ctx.push_str(&s.ecsql);
                ctx.push_str(")");
            }
            ExpKind::LikeRhs(e) => {
                e.rhs.render(ctx);
                if let Some(escape) = &e.escape {
                    ctx.push_str(" ESCAPE ");
                    escape.render(ctx);
                }
            }
            ExpKind::BetweenRange(e) => {
                e.lower.render(ctx);
                ctx.push_str(" AND ");
                e.upper.render(ctx);
            }
            ExpKind::TypeList(e) => {
                ctx.push_str("(");
                for (i, entry) in e.classes.iter().enumerate() {
                    if i > 0 {
                        ctx.push_str(", ");
                    }
                    if !entry.polymorphic {
                        ctx.push_str("ONLY ");
                    }
                    ctx.push_str(&entry.schema);
                    ctx.push_str(".");
                    ctx.push_str(&entry.name);
                }
                ctx.push_str(")");
            }
            ExpKind::Iif(e) => {
                ctx.push_str("IIF(");
                e.condition.render(ctx);
                ctx.push_str(", ");
                e.then_exp.render(ctx);
                ctx.push_str(", ");
                e.else_exp.render(ctx);
                ctx.push_str(")");
            }
            ExpKind::SearchCase(e) => {
                ctx.push_str("CASE");
                for when in &e.when_clauses {
                    ctx.push_str(" ");
                    when.render(ctx);
                }
                if let Some(else_exp) = &e.else_exp {
                    ctx.push_str(" ELSE ");
                    else_exp.render(ctx);
                }
                ctx.push_str(" END");
            }
            ExpKind::When(e) => {
                ctx.push_str("WHEN ");
                e.when.render(ctx);
                ctx.push_str(" THEN ");
                e.then.render(ctx);
            }
        }
    }
}

fn render_list(ctx: &mut RenderContext, exps: &[Exp]) {
    for (i, exp) in exps.iter().enumerate() {
        if i > 0 {
            ctx.push_str(", ");
        }
        exp.render(ctx);
    }
}

fn render_parameter(ctx: &mut RenderContext, param: &ParameterExp) {
    if let Some(name) = &param.name {
        ctx.push_str(":");
        ctx.push_str(name);
        return;
    }
    match (ctx.mode(), param.index) {
        (RenderMode::GenerateNameForUnnamedParameter, Some(index)) => {
            ctx.push_str(&format!(":{}{}", GENERATED_PARAMETER_PREFIX, index));
        }
        _ => ctx.push_str("?"),
    }
}

fn render_literal(ctx: &mut RenderContext, lit: &LiteralValueExp) {
    match lit.literal_type {
        LiteralType::Null => ctx.push_str("NULL"),
        LiteralType::Boolean => ctx.push_str(&lit.raw.to_ascii_uppercase()),
        LiteralType::Integer | LiteralType::Long | LiteralType::Double => ctx.push_str(&lit.raw),
        LiteralType::String => push_quoted(ctx, &lit.raw),
        LiteralType::Date => {
            ctx.push_str("DATE ");
            push_quoted(ctx, &lit.raw);
        }
        LiteralType::Time => {
            ctx.push_str("TIME ");
            push_quoted(ctx, &lit.raw);
        }
        LiteralType::Timestamp => {
            ctx.push_str("TIMESTAMP ");
            push_quoted(ctx, &lit.raw);
        }
    }
}

fn push_quoted(ctx: &mut RenderContext, value: &str) {
    ctx.push_str("'");
    ctx.push_str(&value.replace('\'', "''"));
    ctx.push_str("'");
}
