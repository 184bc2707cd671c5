use std::collections::HashMap;

use crate::error::{BenchError, Result};
use crate::workload::KernelSource;

/// Simple WGSL preprocessor that substitutes `${NAME}` placeholders.
///
/// `@workgroup_size` must be a literal in the WGSL wgpu 0.19 accepts, so the
/// launch geometry's group size is spliced into the source before compilation.
pub struct WgslPreprocessor {
    defines: HashMap<String, String>,
}

impl WgslPreprocessor {
    pub fn new() -> Self {
        Self {
            defines: HashMap::new(),
        }
    }

    pub fn define(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.defines.insert(name.to_string(), value.to_string());
        self
    }

    /// Process WGSL content, replacing every placeholder
    pub fn process_content(&self, content: &str) -> Result<String> {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or_else(|| {
                BenchError::configuration("unterminated placeholder in kernel source")
            })?;
            let name = &after[..end];
            let value = self.defines.get(name).ok_or_else(|| {
                BenchError::configuration(format!("undefined kernel placeholder '{}'", name))
            })?;
            result.push_str(value);
            rest = &after[end + 1..];
        }
        result.push_str(rest);

        Ok(result)
    }
}

impl Default for WgslPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a kernel's source with its workgroup dimensions
pub fn preprocess_kernel(kernel: &KernelSource) -> Result<String> {
    let mut preprocessor = WgslPreprocessor::new();
    preprocessor
        .define("GROUP_X", kernel.group_size.x)
        .define("GROUP_Y", kernel.group_size.y);
    preprocessor.process_content(kernel.wgsl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GroupSize;
    use crate::workload::{PowerTransform, QuarterTurn, Workload};

    #[test]
    fn test_substitution() {
        let mut preprocessor = WgslPreprocessor::new();
        preprocessor.define("GROUP_X", 64).define("GROUP_Y", 4);
        let out = preprocessor
            .process_content("@workgroup_size(${GROUP_X}, ${GROUP_Y})")
            .unwrap();
        assert_eq!(out, "@workgroup_size(64, 4)");
    }

    #[test]
    fn test_undefined_placeholder() {
        let preprocessor = WgslPreprocessor::new();
        assert!(preprocessor.process_content("${MISSING}").is_err());
        assert!(preprocessor.process_content("${GROUP_X").is_err());
    }

    #[test]
    fn test_builtin_kernels_fully_resolved() {
        let power = PowerTransform::new(10, 0.5, 1e-5, 10.0, GroupSize::linear(128)).unwrap();
        let source = preprocess_kernel(&power.accel_kernel()).unwrap();
        assert!(source.contains("@workgroup_size(128)"));
        assert!(!source.contains("${"));

        let rotation = QuarterTurn::square(4, GroupSize::square(8)).unwrap();
        let source = preprocess_kernel(&rotation.accel_kernel()).unwrap();
        assert!(source.contains("@workgroup_size(8, 8)"));
        assert!(!source.contains("${"));
    }
}
