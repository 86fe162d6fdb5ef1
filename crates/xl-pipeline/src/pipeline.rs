use crate::config::PipelineOptions;
use crate::error::{PipelineDiagnostics, PipelineError};
use rayon::prelude::*;
use std::marker::PhantomData;
use xl_core::ast::CompilationUnit;
use xl_core::diagnostics::{Diagnostic, DiagnosticManager};
use xl_core::error::Error;
use xl_core::{debug, warn};
use xl_normalize::{InsertCastsOnNullabilityMismatch, NormalizationPass};

pub trait PipelineStage: Send + Sync {
    type SrcCtx;
    type DstCtx;

    fn name(&self) -> &'static str;
    fn run(
        &self,
        context: Self::SrcCtx,
        diagnostics: &mut PipelineDiagnostics,
        options: &PipelineOptions,
    ) -> Result<Self::DstCtx, PipelineError>;
}

pub struct Pipeline<Src, Dst> {
    run: Box<
        dyn Fn(Src, &mut PipelineDiagnostics, &PipelineOptions) -> Result<Dst, PipelineError>
            + Send
            + Sync,
    >,
}

impl<Src, Dst> Pipeline<Src, Dst> {
    pub fn run(
        &self,
        context: Src,
        diagnostics: &mut PipelineDiagnostics,
        options: &PipelineOptions,
    ) -> Result<Dst, PipelineError> {
        (self.run)(context, diagnostics, options)
    }
}

pub struct PipelineBuilder<Src, Dst> {
    pipeline: Pipeline<Src, Dst>,
    _marker: PhantomData<(Src, Dst)>,
}

impl<Src> PipelineBuilder<Src, Src> {
    pub fn new() -> Self {
        let run = |context: Src,
                   _diagnostics: &mut PipelineDiagnostics,
                   _options: &PipelineOptions| Ok(context);
        Self {
            pipeline: Pipeline {
                run: Box::new(run),
            },
            _marker: PhantomData,
        }
    }
}

impl<Src> Default for PipelineBuilder<Src, Src> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Src, Mid> PipelineBuilder<Src, Mid> {
    pub fn add_stage<Next, S>(self, stage: S) -> PipelineBuilder<Src, Next>
    where
        S: PipelineStage<SrcCtx = Mid, DstCtx = Next> + 'static,
        Src: 'static,
        Mid: 'static,
        Next: 'static,
    {
        let name = stage.name();
        let previous = self.pipeline.run;
        let run = move |context: Src,
                        diagnostics: &mut PipelineDiagnostics,
                        options: &PipelineOptions| {
            let mid = previous(context, diagnostics, options)?;
            match stage.run(mid, diagnostics, options) {
                Ok(next) => {
                    diagnostics.emit_stage(name, options);
                    Ok(next)
                }
                Err(err) if err.stage == name => Err(err),
                Err(err) => Err(PipelineError::new(name, err.message)),
            }
        };

        PipelineBuilder {
            pipeline: Pipeline {
                run: Box::new(run),
            },
            _marker: PhantomData,
        }
    }

    pub fn build(self) -> Pipeline<Src, Mid> {
        self.pipeline
    }
}

/// Runs an ordered list of normalization passes over every compilation unit.
///
/// Units are independent, so they are processed concurrently unless
/// `PipelineOptions::parallel` is off. A failing unit records an error diagnostic and
/// fails the stage once all in-flight units are done.
#[derive(Default)]
pub struct NormalizationStage {
    passes: Vec<Box<dyn NormalizationPass>>,
}

impl NormalizationStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The passes every compilation runs, in order.
    pub fn standard(options: &PipelineOptions) -> Self {
        Self::new().with_pass(InsertCastsOnNullabilityMismatch::new(options.cast_insertion))
    }

    pub fn with_pass(mut self, pass: impl NormalizationPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    fn normalize_unit(&self, unit: &mut CompilationUnit) -> Result<(), Diagnostic> {
        for pass in &self.passes {
            debug!("running {} on {}", pass.name(), unit.path.display());
            if let Err(err) = pass.apply_to(unit) {
                warn!("{} failed on {}: {}", pass.name(), unit.path.display(), err);
                return Err(unit_failure(pass.name(), unit, err));
            }
        }
        Ok(())
    }
}

fn unit_failure(pass: &str, unit: &CompilationUnit, err: Error) -> Diagnostic {
    match err {
        Error::Diagnostic(diagnostic) => diagnostic.with_source_context(pass),
        Error::InternalInvariant(message) => {
            Diagnostic::error(format!("{}: {}", unit.path.display(), message))
                .with_source_context(pass)
                .with_code("compiler-internal")
                .with_suggestion("set XL_LOSSY=1 to downgrade recoverable checks to warnings")
        }
        Error::Generic(report) => {
            Diagnostic::error(format!("{}: {}", unit.path.display(), report))
                .with_source_context(pass)
        }
    }
}

impl PipelineStage for NormalizationStage {
    type SrcCtx = Vec<CompilationUnit>;
    type DstCtx = Vec<CompilationUnit>;

    fn name(&self) -> &'static str {
        "normalize"
    }

    fn run(
        &self,
        mut units: Vec<CompilationUnit>,
        diagnostics: &mut PipelineDiagnostics,
        options: &PipelineOptions,
    ) -> Result<Vec<CompilationUnit>, PipelineError> {
        let _span = tracing::info_span!("normalize", units = units.len()).entered();
        let manager = DiagnosticManager::new();

        if options.parallel {
            units.par_iter_mut().for_each(|unit| {
                if let Err(diagnostic) = self.normalize_unit(unit) {
                    manager.add_diagnostic(diagnostic);
                }
            });
        } else {
            for unit in units.iter_mut() {
                if let Err(diagnostic) = self.normalize_unit(unit) {
                    manager.add_diagnostic(diagnostic);
                    break;
                }
            }
        }

        let failed = manager.has_errors();
        let collected = manager.take();
        let failures = collected.len();
        diagnostics.extend(collected);
        if failed {
            return Err(PipelineError::new(
                self.name(),
                format!("{} compilation unit(s) failed normalization", failures),
            ));
        }
        Ok(units)
    }
}

/// The normalization pipeline every compilation runs.
pub fn standard_pipeline(
    options: &PipelineOptions,
) -> Pipeline<Vec<CompilationUnit>, Vec<CompilationUnit>> {
    PipelineBuilder::new()
        .add_stage(NormalizationStage::standard(options))
        .build()
}
