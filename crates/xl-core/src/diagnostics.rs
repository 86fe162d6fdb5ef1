use crate::span::Span;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

/// Context provided to diagnostic renderers while producing output lines.
pub struct DiagnosticRenderContext<'a> {
    pub context: &'a str,
    pub verbose_info: bool,
}

/// Built-in templates supported by the diagnostic manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticTemplate {
    Pretty,
    Plain,
}

impl DiagnosticTemplate {
    fn render(
        &self,
        diagnostic: &Diagnostic,
        ctx: &DiagnosticRenderContext<'_>,
    ) -> Option<Vec<String>> {
        match self {
            DiagnosticTemplate::Pretty => render_pretty(diagnostic, ctx),
            DiagnosticTemplate::Plain => render_plain(diagnostic, ctx),
        }
    }
}

/// Runtime configuration for emitting diagnostics.
#[derive(Debug, Clone)]
pub struct DiagnosticDisplayOptions {
    pub template: DiagnosticTemplate,
    pub verbose_info: bool,
}

impl DiagnosticDisplayOptions {
    pub fn new(verbose_info: bool) -> Self {
        Self::pretty(verbose_info)
    }

    pub fn pretty(verbose_info: bool) -> Self {
        Self {
            template: DiagnosticTemplate::Pretty,
            verbose_info,
        }
    }

    pub fn plain(verbose_info: bool) -> Self {
        Self {
            template: DiagnosticTemplate::Plain,
            verbose_info,
        }
    }
}

impl Default for DiagnosticDisplayOptions {
    fn default() -> Self {
        DiagnosticDisplayOptions::pretty(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub span: Option<Span>,
    pub suggestions: Vec<String>,
    pub source_context: Option<String>,
    pub code: Option<String>,
}

impl Diagnostic {
    fn with_level(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            span: None,
            suggestions: Vec::new(),
            source_context: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Info, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source_context(mut self, context: impl Into<String>) -> Self {
        self.source_context = Some(context.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }

        if !self.suggestions.is_empty() {
            let hints = self.suggestions.join("; ");
            write!(f, " (hints: {})", hints)?;
        }

        Ok(())
    }
}

/// Thread-safe sink shared by the stages of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticManager {
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl DiagnosticManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_diagnostic(&self, diagnostic: Diagnostic) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic);
        }
    }

    pub fn get_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .lock()
            .map(|d| d.iter().any(|diag| diag.level == DiagnosticLevel::Error))
            .unwrap_or(false)
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }

    /// Emit diagnostics using the provided template and options. The fallback context is used
    /// when a diagnostic does not specify a source context.
    pub fn emit(
        diagnostics: &[Diagnostic],
        fallback_context: Option<&str>,
        options: &DiagnosticDisplayOptions,
    ) {
        for diagnostic in diagnostics {
            let context = diagnostic
                .source_context
                .as_deref()
                .or(fallback_context)
                .unwrap_or("pipeline");

            let render_ctx = DiagnosticRenderContext {
                context,
                verbose_info: options.verbose_info,
            };

            if let Some(lines) = options.template.render(diagnostic, &render_ctx) {
                for line in lines {
                    eprintln!("{}", line);
                }
            }
        }
    }
}

fn render_pretty(
    diagnostic: &Diagnostic,
    ctx: &DiagnosticRenderContext<'_>,
) -> Option<Vec<String>> {
    if matches!(diagnostic.level, DiagnosticLevel::Info) && !ctx.verbose_info {
        return None;
    }

    let prefix = match diagnostic.level {
        DiagnosticLevel::Error => "error",
        DiagnosticLevel::Warning => "warning",
        DiagnosticLevel::Info => "info",
    };

    let header = match diagnostic.code.as_ref() {
        Some(code) => format!("{}[{}]: [{}] {}", prefix, code, ctx.context, diagnostic.message),
        None => format!("{}: [{}] {}", prefix, ctx.context, diagnostic.message),
    };

    let mut lines = vec![header];

    if let Some(span) = &diagnostic.span {
        lines.push(format!("   --> {}", span));
    }

    for suggestion in &diagnostic.suggestions {
        lines.push(format!("   = help: {}", suggestion));
    }

    Some(lines)
}

fn render_plain(diagnostic: &Diagnostic, ctx: &DiagnosticRenderContext<'_>) -> Option<Vec<String>> {
    if matches!(diagnostic.level, DiagnosticLevel::Info) && !ctx.verbose_info {
        return None;
    }

    let level = match diagnostic.level {
        DiagnosticLevel::Error => "ERROR",
        DiagnosticLevel::Warning => "WARNING",
        DiagnosticLevel::Info => "INFO",
    };

    let header = match diagnostic.code.as_ref() {
        Some(code) => format!("[{}] {}: {} ({})", ctx.context, level, diagnostic.message, code),
        None => format!("[{}] {}: {}", ctx.context, level, diagnostic.message),
    };

    let mut lines = vec![header];

    if let Some(span) = &diagnostic.span {
        lines.push(format!("   at {}", span));
    }

    for suggestion in &diagnostic.suggestions {
        lines.push(format!("   suggestion: {}", suggestion));
    }

    Some(lines)
}
