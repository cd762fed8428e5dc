//! Evaluating compiled expressions and expanding directives in template text.

use tagsmith::RenderOptions;

use crate::parse::{Arg, Expr, compile};
use crate::registry::Registry;
use crate::{Context, Directive, DirectiveError};

/// Evaluates directive expressions with a set of factories and render options.
#[derive(Debug, Default)]
pub struct Renderer {
    registry: Registry,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(registry: Registry, options: RenderOptions) -> Self {
        Self { registry, options }
    }

    /// Same factories, different options for every tree built from now on.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Build the tree an expression describes and render it whole.
    pub fn render(&self, expr: &Expr, ctx: &Context) -> Result<String, DirectiveError> {
        let args = resolve(&expr.call.args, ctx)?;
        let mut markup = self.registry.build(&expr.call.name, &args, &self.options)?;

        let mut node = markup.root_mut();
        for call in &expr.chain {
            let args = resolve(&call.args, ctx)?;
            node = node.call(&call.name, &args)?;
        }

        Ok(markup.to_string())
    }

    /// Compile and render the text between a directive's parentheses.
    pub fn render_directive(
        &self,
        directive: Directive,
        expression: &str,
        ctx: &Context,
    ) -> Result<String, DirectiveError> {
        let expr = compile(directive, expression)?;
        self.render(&expr, ctx)
    }

    /// Replace every `@icon(...)` and `@html(...)` in `template` with its
    /// rendered output.
    ///
    /// `@@` writes a single `@`, so `@@icon(x)` stays literal text. Any other
    /// `@` passes through untouched.
    pub fn expand(&self, template: &str, ctx: &Context) -> Result<String, DirectiveError> {
        let mut out = String::with_capacity(template.len());
        let mut pos = 0;
        let mut _expanded = 0usize;

        while let Some(offset) = template[pos..].find('@') {
            let at = pos + offset;
            out.push_str(&template[pos..at]);

            let after = &template[at + 1..];
            if after.starts_with('@') {
                out.push('@');
                pos = at + 2;
                continue;
            }

            let name_len = after
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                .count();
            let open = at + 1 + name_len;
            let directive = Directive::from_name(&after[..name_len])
                .filter(|_| template[open..].starts_with('('));

            let Some(directive) = directive else {
                out.push('@');
                pos = at + 1;
                continue;
            };

            let close = closing_paren(template, open).ok_or_else(|| DirectiveError::Unclosed {
                name: directive.name().to_string(),
                position: at,
            })?;
            let expression = &template[open + 1..close];
            trace!(%directive, position = at, expression, "expanding");
            out.push_str(&self.render_directive(directive, expression, ctx)?);
            _expanded += 1;
            pos = close + 1;
        }

        out.push_str(&template[pos..]);
        debug!(directives = _expanded, len = out.len(), "expanded template");
        Ok(out)
    }
}

fn resolve(args: &[Arg], ctx: &Context) -> Result<Vec<String>, DirectiveError> {
    args.iter()
        .map(|arg| match arg {
            Arg::Str(s) => Ok(s.clone()),
            Arg::Int(n) => Ok(n.to_string()),
            Arg::Bool(b) => Ok(b.to_string()),
            Arg::Null => Ok(String::new()),
            Arg::Var(name) => ctx.get(name).map(str::to_string).ok_or_else(|| {
                DirectiveError::UndefinedVariable { name: name.clone() }
            }),
        })
        .collect()
}

/// Byte offset of the `)` matching the `(` at `open`, skipping quoted text.
fn closing_paren(template: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;

    for (idx, c) in template[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}
