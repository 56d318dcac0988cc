// Pipeline 模块 - 有序处理管道
//
// 由若干命名阶段组成：
// - 调用时输入依次流经每个阶段的 transform
// - 序列输入下阶段可以改变元素个数或形状（例如分词后接 n-gram）
// - 任一阶段失败，整次调用中止，错误原样返回

use std::fmt;

use crate::error::Result;
use crate::transform::{Transform, Value};

/// 命名阶段
pub type Step = (String, Box<dyn Transform>);

/// 有序处理管道
///
/// 本身也是一个 [`Transform`]，因此可以嵌套或与其他管道拼接。
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由已装箱的阶段列表构造
    pub fn from_steps(steps: Vec<Step>) -> Self {
        tracing::debug!(
            "Pipeline 构建完成: [{}]",
            steps
                .iter()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self { steps }
    }

    /// 追加一个阶段（构建器风格）
    pub fn step(mut self, name: impl Into<String>, transform: impl Transform + 'static) -> Self {
        self.steps.push((name.into(), Box::new(transform)));
        self
    }

    /// 拼接：`self` 的阶段之后接 `other` 的阶段
    pub fn then(mut self, other: Pipeline) -> Pipeline {
        self.steps.extend(other.steps);
        self
    }

    /// 阶段名（按执行顺序）
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().map(|(name, _)| name.as_str())
    }

    /// 按名称查找阶段（同名时取第一个）
    pub fn get(&self, name: &str) -> Option<&dyn Transform> {
        self.steps
            .iter()
            .find(|(step_name, _)| step_name == name)
            .map(|(_, transform)| transform.as_ref())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn check_input(x: &Value) -> Result<()> {
        match x {
            Value::Text(_) | Value::List(_) | Value::Seq(_) => Ok(()),
            other => Err(other.type_error()),
        }
    }
}

impl Transform for Pipeline {
    fn fit(&mut self, x: &Value) -> Result<()> {
        for (_, step) in self.steps.iter_mut() {
            step.fit(x)?;
        }
        Ok(())
    }

    fn transform(&self, x: Value) -> Result<Value> {
        Self::check_input(&x)?;
        self.steps.iter().try_fold(x, |acc, (name, step)| {
            tracing::trace!("Pipeline 阶段: {}", name);
            step.transform(acc)
        })
    }

    /// 逐阶段 `fit_transform`：每个阶段用上一阶段的输出训练
    fn fit_transform(&mut self, x: Value) -> Result<Value> {
        Self::check_input(&x)?;
        self.steps
            .iter_mut()
            .try_fold(x, |acc, (_, step)| step.fit_transform(acc))
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::error::Error;
    use crate::preprocessing::{
        DigitFilter, DigitNormalizer, PunctuationNormalizer, SpacingStandardizer,
    };
    use crate::transform::TextTransform;

    struct Failing;

    impl Transform for Failing {
        fn transform(&self, _x: Value) -> Result<Value> {
            Err(Error::Inference("boom".to_string()))
        }
    }

    struct CountingFit(Arc<AtomicUsize>);

    impl Transform for CountingFit {
        fn fit(&mut self, _x: &Value) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn transform(&self, x: Value) -> Result<Value> {
            Ok(x)
        }
    }

    fn punct_then_digit() -> Pipeline {
        Pipeline::new()
            .step("PunctuationNormalizer", PunctuationNormalizer::new().unwrap())
            .step("DigitNormalizer", DigitNormalizer::new().unwrap())
    }

    #[test]
    fn test_pipeline_equals_manual_chaining() {
        let pipeline = punct_then_digit();
        let text = "قیمت ?۱2٣ تومان، 45%";

        let manual = DigitNormalizer::new()
            .unwrap()
            .transform_text(&PunctuationNormalizer::new().unwrap().transform_text(text));
        let piped = pipeline.apply(text).unwrap().into_text().unwrap();

        assert_eq!(piped, manual);
        assert_eq!(piped, "قیمت ؟۱۲۳ تومان، ۴۵٪");
    }

    #[test]
    fn test_pipeline_on_sequence_is_elementwise() {
        let pipeline = punct_then_digit();
        let out = pipeline
            .apply(vec!["سلام?", "12"])
            .unwrap()
            .into_strings()
            .unwrap();
        assert_eq!(out, vec!["سلام؟", "۱۲"]);
    }

    #[test]
    fn test_pipeline_rejects_non_text() {
        let err = punct_then_digit().apply(3.0).unwrap_err();
        assert!(matches!(err, Error::InputType { found: "number" }));
    }

    #[test]
    fn test_failing_stage_aborts_call() {
        let pipeline = Pipeline::new()
            .step("digits", DigitFilter::new().unwrap())
            .step("fail", Failing)
            .step("spacing", SpacingStandardizer::new().unwrap());
        let err = pipeline.apply("۱۲ سلام").unwrap_err();
        assert!(matches!(err, Error::Inference(ref m) if m == "boom"));
    }

    #[test]
    fn test_fit_reaches_every_stage() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut pipeline = Pipeline::new()
            .step("a", CountingFit(Arc::clone(&counter)))
            .step("b", CountingFit(Arc::clone(&counter)));

        pipeline.fit(&Value::from("x")).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        let out = pipeline.fit_transform(Value::from("x")).unwrap();
        assert_eq!(out.into_text().unwrap(), "x");
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_names_get_and_then() {
        let tail = Pipeline::new().step("SpacingStandardizer", SpacingStandardizer::new().unwrap());
        let pipeline = punct_then_digit().then(tail);

        assert_eq!(
            pipeline.names().collect::<Vec<_>>(),
            vec!["PunctuationNormalizer", "DigitNormalizer", "SpacingStandardizer"]
        );
        assert_eq!(pipeline.len(), 3);
        assert!(pipeline.get("DigitNormalizer").is_some());
        assert!(pipeline.get("Missing").is_none());

        let out = pipeline.apply("  12 ?  ").unwrap().into_text().unwrap();
        assert_eq!(out, "۱۲ ؟");
    }

    #[test]
    fn test_steps_fixed_after_construction() {
        let pipeline = Pipeline::from_steps(vec![
            (
                "DigitNormalizer".to_string(),
                Box::new(DigitNormalizer::new().unwrap()) as Box<dyn Transform>,
            ),
            (
                "DigitFilter".to_string(),
                Box::new(DigitFilter::new().unwrap()) as Box<dyn Transform>,
            ),
        ]);

        let first = pipeline.apply("کد 12").unwrap().into_text().unwrap();
        let second = pipeline.apply("کد 12").unwrap().into_text().unwrap();
        assert_eq!(first, "کد");
        assert_eq!(first, second);
        assert_eq!(
            pipeline.names().collect::<Vec<_>>(),
            vec!["DigitNormalizer", "DigitFilter"]
        );
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply("سلام").unwrap().into_text().unwrap(), "سلام");
    }
}
