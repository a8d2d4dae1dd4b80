use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use wgpu::naga::front::glsl;
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};
use wgpu::naga::ShaderStage;

use crate::types::ShaderPaths;

/// The two programmable stages of the Julia program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    fn naga_stage(self) -> ShaderStage {
        match self {
            StageKind::Vertex => ShaderStage::Vertex,
            StageKind::Fragment => ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader at {}", path.display())]
    Read {
        stage: StageKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader {} failed to compile:\n{diagnostics}", path.display())]
    Compile {
        stage: StageKind,
        path: PathBuf,
        diagnostics: String,
    },
    #[error("failed to link shader program: {0}")]
    Link(String),
}

/// GLSL source of one stage together with where it came from.
#[derive(Debug, Clone)]
pub struct StageSource {
    pub kind: StageKind,
    pub path: PathBuf,
    pub code: String,
}

impl StageSource {
    /// Reads a stage from disk and checks it offline with naga.
    ///
    /// Catching errors here gives readable diagnostics with source spans
    /// before any GPU object exists.
    pub fn load(kind: StageKind, path: &Path) -> Result<Self, ShaderError> {
        let code = std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
            stage: kind,
            path: path.to_path_buf(),
            source,
        })?;
        let stage = Self {
            kind,
            path: path.to_path_buf(),
            code,
        };
        stage.validate()?;
        Ok(stage)
    }

    /// Parses and validates the source into a naga module.
    pub fn validate(&self) -> Result<wgpu::naga::Module, ShaderError> {
        let mut frontend = glsl::Frontend::default();
        let options = glsl::Options::from(self.kind.naga_stage());
        let module = frontend
            .parse(&options, &self.code)
            .map_err(|errors| self.compile_error(errors.emit_to_string(&self.code)))?;
        Validator::new(ValidationFlags::all(), Capabilities::empty())
            .validate(&module)
            .map_err(|error| self.compile_error(error.emit_to_string(&self.code)))?;
        Ok(module)
    }

    fn compile_error(&self, diagnostics: String) -> ShaderError {
        ShaderError::Compile {
            stage: self.kind,
            path: self.path.clone(),
            diagnostics,
        }
    }

    /// Creates the GPU shader module, surfacing validation failures as errors.
    pub(crate) fn compile(&self, device: &wgpu::Device) -> Result<wgpu::ShaderModule, ShaderError> {
        let label = format!("julia {} shader", self.kind);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Glsl {
                shader: Cow::Borrowed(&self.code),
                stage: self.kind.naga_stage(),
                defines: &[],
            },
        });
        match pollster::block_on(device.pop_error_scope()) {
            Some(error) => Err(self.compile_error(error.to_string())),
            None => Ok(module),
        }
    }
}

/// Both stages of the program, loaded and checked.
#[derive(Debug, Clone)]
pub struct ProgramSources {
    pub vertex: StageSource,
    pub fragment: StageSource,
}

impl ProgramSources {
    pub fn load(paths: &ShaderPaths) -> Result<Self, ShaderError> {
        let vertex = StageSource::load(StageKind::Vertex, &paths.vertex)?;
        let fragment = StageSource::load(StageKind::Fragment, &paths.fragment)?;
        tracing::debug!(
            vertex = %vertex.path.display(),
            fragment = %fragment.path.display(),
            "loaded shader sources"
        );
        Ok(Self { vertex, fragment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::naga::TypeInner;

    fn uniform_members(module: &wgpu::naga::Module, instance: &str) -> Vec<String> {
        let (_, global) = module
            .global_variables
            .iter()
            .find(|(_, global)| global.name.as_deref() == Some(instance))
            .expect("uniform block instance");
        match &module.types[global.ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .filter_map(|member| member.name.clone())
                .collect(),
            other => panic!("expected a struct, found {other:?}"),
        }
    }

    #[test]
    fn shipped_shaders_validate() {
        let sources = ProgramSources::load(&ShaderPaths::default()).expect("shipped shaders");
        assert!(sources.vertex.code.contains("vVertex"));
        assert!(sources.fragment.code.contains("gradient_texture"));
    }

    #[test]
    fn both_stages_expose_julia_uniforms() {
        let sources = ProgramSources::load(&ShaderPaths::default()).expect("shipped shaders");
        for stage in [&sources.vertex, &sources.fragment] {
            let module = stage.validate().expect("valid module");
            assert_eq!(uniform_members(&module, "julia"), ["C", "offset", "zoom"]);
        }
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = StageSource::load(StageKind::Vertex, Path::new("/nonexistent/julia.vert"))
            .expect_err("missing shader must fail");
        assert!(matches!(err, ShaderError::Read { stage: StageKind::Vertex, .. }));
        assert!(err.to_string().contains("/nonexistent/julia.vert"));
    }

    #[test]
    fn syntax_errors_fail_loudly() {
        let stage = StageSource {
            kind: StageKind::Fragment,
            path: PathBuf::from("broken.frag"),
            code: "#version 450\nvoid main() { this is not glsl }\n".to_string(),
        };
        let err = stage.validate().expect_err("broken shader must fail");
        assert!(matches!(err, ShaderError::Compile { stage: StageKind::Fragment, .. }));
        assert!(err.to_string().contains("broken.frag"));
    }
}
