// crates/vf_field/src/patches/registry.rs

//! 边界条件注册表
//!
//! 按类型名查构造器的运行时分发机制：求解器和插件可注入自定义
//! 条件类型，持久记录里只存类型名字符串。
//!
//! # 命名规范
//!
//! 类型名强制 snake_case（小写字母、数字、下划线，字母开头），
//! 防止 `fixedValue`/`fixed_value` 两套写法并存。
//!
//! # 用法
//!
//! ```
//! use vf_field::patches::PatchRegistry;
//! use vf_mesh::PatchSpec;
//!
//! let registry = PatchRegistry::<f64>::standard();
//! let spec = PatchSpec::new("inlet", vec![0, 1]);
//! let patch = registry.construct("fixed_value", &spec, "T").unwrap();
//! assert!(patch.fixes_value());
//! ```

use std::collections::HashMap;

use vf_foundation::record::Record;
use vf_mesh::PatchSpec;

use crate::error::{FieldError, FieldResult};
use crate::patches::calculated::CalculatedPatch;
use crate::patches::coupled::CoupledPatch;
use crate::patches::extrapolated::ExtrapolatedPatch;
use crate::patches::fixed_gradient::FixedGradientPatch;
use crate::patches::fixed_value::FixedValuePatch;
use crate::patches::traits::PatchField;
use crate::patches::zero_gradient::ZeroGradientPatch;
use crate::value::FieldValue;

/// 默认构造函数：按片规格建零状态条件
pub type ConstructFn<T> = fn(&PatchSpec, &str) -> FieldResult<Box<dyn PatchField<T>>>;

/// 记录构造函数：从持久记录还原条件系数
pub type ReadFn<T> = fn(&PatchSpec, &Record, &str) -> FieldResult<Box<dyn PatchField<T>>>;

/// 一个条件类型的两条构造路径
pub struct RegistryEntry<T: FieldValue> {
    construct: ConstructFn<T>,
    read: ReadFn<T>,
}

impl<T: FieldValue> RegistryEntry<T> {
    /// 打包默认构造与记录构造
    pub fn new(construct: ConstructFn<T>, read: ReadFn<T>) -> Self {
        Self { construct, read }
    }
}

impl<T: FieldValue> Clone for RegistryEntry<T> {
    fn clone(&self) -> Self {
        Self {
            construct: self.construct,
            read: self.read,
        }
    }
}

/// 验证类型名是否符合 snake_case 规范
fn validate_type_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("名称为空");
    }
    let mut prev = '\0';
    for (i, ch) in name.chars().enumerate() {
        match ch {
            'a'..='z' | '0'..='9' => {}
            '_' => {
                if i == 0 {
                    return Err("不能以下划线开头");
                }
                if prev == '_' {
                    return Err("不能包含连续下划线");
                }
            }
            _ => return Err("仅允许小写字母、数字和下划线"),
        }
        prev = ch;
    }
    if name.ends_with('_') {
        return Err("不能以下划线结尾");
    }
    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err("必须以字母开头");
    }
    Ok(())
}

/// 边界条件注册表
///
/// 名称到构造器的映射，迭代顺序按注册顺序保持稳定。
/// 注册表不存条件实例，只存构造路径。
pub struct PatchRegistry<T: FieldValue> {
    /// 类型名到构造器的映射
    entries: HashMap<String, RegistryEntry<T>>,
    /// 注册顺序（保证迭代一致性）
    order: Vec<String>,
}

impl<T: FieldValue> PatchRegistry<T> {
    /// 创建空注册表
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// 创建标准注册表
    ///
    /// 自动注册内置条件：
    /// - `calculated`: 导出型，边界值取内侧值
    /// - `fixed_value`: Dirichlet 固定值
    /// - `fixed_gradient`: Neumann 固定梯度
    /// - `zero_gradient`: 零法向梯度
    /// - `coupled`: 成对耦合接口
    /// - `extrapolated`: 两层线性外推
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry
            .register(
                "calculated",
                RegistryEntry::new(
                    |spec, _field| Ok(Box::new(CalculatedPatch::new(spec))),
                    |spec, rec, field| {
                        Ok(Box::new(CalculatedPatch::from_record(spec, rec, field)?))
                    },
                ),
            )
            .unwrap();

        registry
            .register(
                "fixed_value",
                RegistryEntry::new(
                    |spec, _field| Ok(Box::new(FixedValuePatch::new(spec))),
                    |spec, rec, field| {
                        Ok(Box::new(FixedValuePatch::from_record(spec, rec, field)?))
                    },
                ),
            )
            .unwrap();

        registry
            .register(
                "fixed_gradient",
                RegistryEntry::new(
                    |spec, _field| Ok(Box::new(FixedGradientPatch::new(spec))),
                    |spec, rec, field| {
                        Ok(Box::new(FixedGradientPatch::from_record(spec, rec, field)?))
                    },
                ),
            )
            .unwrap();

        registry
            .register(
                "zero_gradient",
                RegistryEntry::new(
                    |spec, _field| Ok(Box::new(ZeroGradientPatch::new(spec))),
                    |spec, rec, field| {
                        Ok(Box::new(ZeroGradientPatch::from_record(spec, rec, field)?))
                    },
                ),
            )
            .unwrap();

        registry
            .register(
                "coupled",
                RegistryEntry::new(
                    |spec, field| Ok(Box::new(CoupledPatch::from_spec(spec, field)?)),
                    |spec, rec, field| Ok(Box::new(CoupledPatch::from_record(spec, rec, field)?)),
                ),
            )
            .unwrap();

        registry
            .register(
                "extrapolated",
                RegistryEntry::new(
                    |spec, _field| Ok(Box::new(ExtrapolatedPatch::new(spec))),
                    |spec, rec, field| {
                        Ok(Box::new(ExtrapolatedPatch::from_record(spec, rec, field)?))
                    },
                ),
            )
            .unwrap();

        registry
    }

    /// 注册条件类型
    ///
    /// 重复注册更新构造器但保留原顺序。
    pub fn register(&mut self, name: &str, entry: RegistryEntry<T>) -> FieldResult<()> {
        if let Err(reason) = validate_type_name(name) {
            return Err(FieldError::InvalidPatchTypeName {
                type_name: name.to_string(),
                reason,
            });
        }
        if self.entries.contains_key(name) {
            self.entries.insert(name.to_string(), entry);
            return Ok(());
        }
        self.order.push(name.to_string());
        self.entries.insert(name.to_string(), entry);
        Ok(())
    }

    /// 类型是否已注册
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// 已注册的类型名，按注册顺序
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// 按类型名默认构造
    pub fn construct(
        &self,
        type_name: &str,
        spec: &PatchSpec,
        field: &str,
    ) -> FieldResult<Box<dyn PatchField<T>>> {
        match self.entries.get(type_name) {
            Some(entry) => (entry.construct)(spec, field),
            None => Err(FieldError::unknown_patch_type(field, spec.name(), type_name)),
        }
    }

    /// 按类型名从持久记录构造
    pub fn read(
        &self,
        type_name: &str,
        spec: &PatchSpec,
        rec: &Record,
        field: &str,
    ) -> FieldResult<Box<dyn PatchField<T>>> {
        match self.entries.get(type_name) {
            Some(entry) => (entry.read)(spec, rec, field),
            None => Err(FieldError::unknown_patch_type(field, spec.name(), type_name)),
        }
    }
}

impl<T: FieldValue> Default for PatchRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FieldValue> Clone for PatchRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            order: self.order.clone(),
        }
    }
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registers_builtins_in_order() {
        let registry = PatchRegistry::<f64>::standard();
        assert_eq!(
            registry.names(),
            vec![
                "calculated",
                "fixed_value",
                "fixed_gradient",
                "zero_gradient",
                "coupled",
                "extrapolated"
            ]
        );
    }

    #[test]
    fn test_construct_by_name() {
        let registry = PatchRegistry::<f64>::standard();
        let spec = PatchSpec::new("inlet", vec![0, 1]);

        let patch = registry.construct("fixed_value", &spec, "T").unwrap();
        assert_eq!(patch.type_name(), "fixed_value");
        assert!(patch.fixes_value());

        let patch = registry.construct("zero_gradient", &spec, "T").unwrap();
        assert!(!patch.fixes_value());
    }

    #[test]
    fn test_unknown_type_errors() {
        let registry = PatchRegistry::<f64>::standard();
        let spec = PatchSpec::new("inlet", vec![0]);
        let err = registry.construct("slip_wall", &spec, "U").unwrap_err();
        assert!(matches!(err, FieldError::UnknownPatchType { .. }));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut registry = PatchRegistry::<f64>::new();
        let entry = RegistryEntry::new(
            |spec, _field| Ok(Box::new(CalculatedPatch::new(spec))),
            |spec, rec, field| Ok(Box::new(CalculatedPatch::from_record(spec, rec, field)?)),
        );

        for bad in ["", "fixedValue", "_leading", "trailing_", "a__b", "1st"] {
            let err = registry.register(bad, entry.clone()).unwrap_err();
            assert!(matches!(err, FieldError::InvalidPatchTypeName { .. }), "{bad}");
        }
    }

    #[test]
    fn test_reregister_keeps_order() {
        let mut registry = PatchRegistry::<f64>::standard();
        let entry = RegistryEntry::new(
            |spec, _field| Ok(Box::new(CalculatedPatch::new(spec))),
            |spec, rec, field| Ok(Box::new(CalculatedPatch::from_record(spec, rec, field)?)),
        );
        registry.register("fixed_value", entry).unwrap();

        // 顺序不变，构造器被替换
        assert_eq!(registry.names()[1], "fixed_value");
        let spec = PatchSpec::new("inlet", vec![0]);
        let patch = registry.construct("fixed_value", &spec, "T").unwrap();
        assert_eq!(patch.type_name(), "calculated");
    }
}
