//! Template skeletons: a fixed sequence of steps, some shared, some left for
//! each variant to supply, optionally gated by hooks.
//!
//! Two ways to fill a skeleton:
//! - **Inheritance-style**: implement [`TemplateVariant`] and inherit its
//!   [`init`](TemplateVariant::init). A slot the variant forgot surfaces when
//!   `init` reaches it.
//! - **Composition-style**: pass a [`Slots`] set to
//!   [`Skeleton::compose`], which checks every ungated slot up front and
//!   returns a [`Template`] with the same `init` entry point. A gated slot
//!   left out is only an error if its hook lets a run reach it.

use crate::core::error::TemplateError;
use std::collections::HashMap;
use std::sync::Arc;

/// A step implementation.
pub type StepFn<C> = Arc<dyn Fn(&mut C) + Send + Sync>;
/// A hook predicate.
pub type HookFn<C> = Arc<dyn Fn(&C) -> bool + Send + Sync>;

enum Body<C> {
    Fixed(StepFn<C>),
    Slot,
}

struct Step<C> {
    name: String,
    body: Body<C>,
    gate: Option<String>,
}

impl<C> Clone for Step<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            body: match &self.body {
                Body::Fixed(f) => Body::Fixed(Arc::clone(f)),
                Body::Slot => Body::Slot,
            },
            gate: self.gate.clone(),
        }
    }
}

/// Which steps a run executed and which a hook skipped, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunReport {
    pub executed: Vec<String>,
    pub skipped: Vec<String>,
}

/// Supplies slot bodies and hook answers to a skeleton run.
trait StepSource<C> {
    /// Runs the body for `step`; `false` means nothing was supplied.
    fn run_slot(&self, step: &str, cx: &mut C) -> bool;
    fn hook(&self, name: &str, cx: &C) -> Option<bool>;
}

/// An ordered, immutable step sequence.
pub struct Skeleton<C> {
    name: String,
    steps: Vec<Step<C>>,
    hooks: Vec<(String, bool)>,
}

impl<C> Clone for Skeleton<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            steps: self.steps.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

impl<C> std::fmt::Debug for Skeleton<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skeleton")
            .field("name", &self.name)
            .field("steps", &self.step_names())
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl<C> Skeleton<C> {
    pub fn builder(name: &str) -> SkeletonBuilder<C> {
        SkeletonBuilder {
            name: name.to_string(),
            steps: Vec::new(),
            hooks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    /// Steps a variant has to supply.
    pub fn slot_names(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| matches!(s.body, Body::Slot))
            .map(|s| s.name.as_str())
            .collect()
    }

    pub fn hook_default(&self, hook: &str) -> Option<bool> {
        self.hooks
            .iter()
            .find(|(name, _)| name == hook)
            .map(|(_, default)| *default)
    }

    /// Validates `slots` against this skeleton and binds them into a
    /// [`Template`].
    ///
    /// Every ungated slot must be supplied; fixed steps and undeclared names
    /// are rejected. Nothing runs until [`Template::init`].
    pub fn compose(&self, slots: Slots<C>) -> Result<Template<C>, TemplateError> {
        let mut supplied: Vec<&String> = slots.steps.keys().collect();
        supplied.sort();
        for name in supplied {
            match self.steps.iter().find(|s| &s.name == name) {
                None => {
                    return Err(TemplateError::UnknownStep {
                        skeleton: self.name.clone(),
                        step: name.clone(),
                    });
                }
                Some(Step {
                    body: Body::Fixed(_),
                    ..
                }) => {
                    return Err(TemplateError::NotOverridable {
                        skeleton: self.name.clone(),
                        step: name.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        let mut hooks: Vec<&String> = slots.hooks.keys().collect();
        hooks.sort();
        if let Some(hook) = hooks.into_iter().find(|h| self.hook_default(h).is_none()) {
            return Err(TemplateError::UnknownHook {
                skeleton: self.name.clone(),
                hook: hook.clone(),
            });
        }

        if let Some(missing) = self
            .steps
            .iter()
            .filter(|s| matches!(s.body, Body::Slot) && s.gate.is_none())
            .map(|s| s.name.as_str())
            .find(|slot| !slots.steps.contains_key(*slot))
        {
            return Err(TemplateError::MissingOverride {
                skeleton: self.name.clone(),
                step: missing.to_string(),
            });
        }

        Ok(Template {
            skeleton: self.clone(),
            slots,
        })
    }

    fn run(&self, source: &dyn StepSource<C>, cx: &mut C) -> Result<RunReport, TemplateError> {
        let mut report = RunReport::default();
        for step in &self.steps {
            if let Some(hook) = &step.gate {
                let default = self.hook_default(hook).unwrap_or(true);
                if !source.hook(hook, cx).unwrap_or(default) {
                    log::debug!("{}: hook '{}' skipped '{}'", self.name, hook, step.name);
                    report.skipped.push(step.name.clone());
                    continue;
                }
            }

            match &step.body {
                Body::Fixed(f) => f(cx),
                Body::Slot => {
                    if !source.run_slot(&step.name, cx) {
                        log::warn!("{}: step '{}' was not overridden", self.name, step.name);
                        return Err(TemplateError::MissingOverride {
                            skeleton: self.name.clone(),
                            step: step.name.clone(),
                        });
                    }
                }
            }
            report.executed.push(step.name.clone());
        }
        Ok(report)
    }
}

/// Builds a [`Skeleton`] step by step.
pub struct SkeletonBuilder<C> {
    name: String,
    steps: Vec<Step<C>>,
    hooks: Vec<(String, bool)>,
}

impl<C> SkeletonBuilder<C> {
    /// A shared step every variant runs as-is.
    pub fn fixed<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.push(name, Body::Fixed(Arc::new(f)), None)
    }

    /// A step each variant must supply.
    pub fn slot(self, name: &str) -> Self {
        self.push(name, Body::Slot, None)
    }

    /// Declares a hook and the answer used when a variant does not override it.
    pub fn hook(mut self, name: &str, default: bool) -> Self {
        if let Some(existing) = self.hooks.iter_mut().find(|(n, _)| n == name) {
            log::warn!("Hook {} declared twice, overwriting its default.", name);
            existing.1 = default;
        } else {
            self.hooks.push((name.to_string(), default));
        }
        self
    }

    /// A slot that only runs when `hook` answers true.
    pub fn gated_slot(self, name: &str, hook: &str) -> Self {
        self.push(name, Body::Slot, Some(hook))
    }

    /// A fixed step that only runs when `hook` answers true.
    pub fn gated_fixed<F>(self, name: &str, hook: &str, f: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.push(name, Body::Fixed(Arc::new(f)), Some(hook))
    }

    fn push(mut self, name: &str, body: Body<C>, gate: Option<&str>) -> Self {
        self.steps.push(Step {
            name: name.to_string(),
            body,
            gate: gate.map(str::to_string),
        });
        self
    }

    pub fn build(self) -> Result<Skeleton<C>, TemplateError> {
        for (i, step) in self.steps.iter().enumerate() {
            if self.steps[..i].iter().any(|s| s.name == step.name) {
                return Err(TemplateError::DuplicateStep {
                    skeleton: self.name.clone(),
                    step: step.name.clone(),
                });
            }
            if let Some(hook) = &step.gate {
                if !self.hooks.iter().any(|(n, _)| n == hook) {
                    return Err(TemplateError::UnknownHook {
                        skeleton: self.name.clone(),
                        hook: hook.clone(),
                    });
                }
            }
        }
        Ok(Skeleton {
            name: self.name,
            steps: self.steps,
            hooks: self.hooks,
        })
    }
}

/// Slot bodies and hook answers for a composition-style variant.
pub struct Slots<C> {
    steps: HashMap<String, StepFn<C>>,
    hooks: HashMap<String, HookFn<C>>,
}

impl<C> Default for Slots<C> {
    fn default() -> Self {
        Self {
            steps: HashMap::new(),
            hooks: HashMap::new(),
        }
    }
}

impl<C> Clone for Slots<C> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

impl<C> Slots<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        if self.steps.insert(name.to_string(), Arc::new(f)).is_some() {
            log::warn!("Step {} was supplied twice, keeping the last one.", name);
        }
        self
    }

    pub fn hook<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        if self.hooks.insert(name.to_string(), Arc::new(f)).is_some() {
            log::warn!("Hook {} was supplied twice, keeping the last one.", name);
        }
        self
    }
}

impl<C> StepSource<C> for Slots<C> {
    fn run_slot(&self, step: &str, cx: &mut C) -> bool {
        match self.steps.get(step) {
            Some(f) => {
                f(cx);
                true
            }
            None => false,
        }
    }

    fn hook(&self, name: &str, cx: &C) -> Option<bool> {
        self.hooks.get(name).map(|h| h(cx))
    }
}

/// A skeleton bound to a validated [`Slots`] set.
pub struct Template<C> {
    skeleton: Skeleton<C>,
    slots: Slots<C>,
}

impl<C> Clone for Template<C> {
    fn clone(&self) -> Self {
        Self {
            skeleton: self.skeleton.clone(),
            slots: self.slots.clone(),
        }
    }
}

impl<C> std::fmt::Debug for Template<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut steps: Vec<&String> = self.slots.steps.keys().collect();
        steps.sort();
        let mut hooks: Vec<&String> = self.slots.hooks.keys().collect();
        hooks.sort();
        f.debug_struct("Template")
            .field("skeleton", &self.skeleton)
            .field("steps", &steps)
            .field("hooks", &hooks)
            .finish()
    }
}

impl<C> Template<C> {
    pub fn skeleton(&self) -> &Skeleton<C> {
        &self.skeleton
    }

    /// Runs every step in skeleton order.
    pub fn init(&self, cx: &mut C) -> Result<RunReport, TemplateError> {
        self.skeleton.run(&self.slots, cx)
    }
}

/// An inheritance-style variant of a skeleton.
///
/// Implementors answer for the slots they override and, optionally, for
/// hooks; [`init`](TemplateVariant::init) is inherited and should not be
/// replaced.
pub trait TemplateVariant<C>: Send + Sync {
    /// The skeleton this variant extends.
    fn skeleton(&self) -> &Skeleton<C>;

    /// Runs this variant's body for `step`.
    ///
    /// # Returns
    /// `false` when the variant does not override `step`
    fn run_slot(&self, step: &str, cx: &mut C) -> bool;

    /// Overrides a hook. `None` keeps the skeleton's default.
    fn hook(&self, _name: &str, _cx: &C) -> Option<bool> {
        None
    }

    /// The template method: runs every step in skeleton order.
    fn init(&self, cx: &mut C) -> Result<RunReport, TemplateError> {
        self.skeleton().run(&VariantSteps(self), cx)
    }
}

struct VariantSteps<'a, V: ?Sized>(&'a V);

impl<C, V: TemplateVariant<C> + ?Sized> StepSource<C> for VariantSteps<'_, V> {
    fn run_slot(&self, step: &str, cx: &mut C) -> bool {
        self.0.run_slot(step, cx)
    }

    fn hook(&self, name: &str, cx: &C) -> Option<bool> {
        self.0.hook(name, cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Vec<String>;

    fn skeleton() -> Skeleton<Log> {
        Skeleton::builder("routine")
            .fixed("open", |log: &mut Log| log.push("open".into()))
            .slot("work")
            .hook("tidy", true)
            .gated_slot("clean", "tidy")
            .fixed("close", |log: &mut Log| log.push("close".into()))
            .build()
            .unwrap()
    }

    struct Worker {
        skeleton: Skeleton<Log>,
        tidy: Option<bool>,
        skip_work: bool,
    }

    impl TemplateVariant<Log> for Worker {
        fn skeleton(&self) -> &Skeleton<Log> {
            &self.skeleton
        }

        fn run_slot(&self, step: &str, log: &mut Log) -> bool {
            match step {
                "work" if !self.skip_work => log.push("work".into()),
                "clean" => log.push("clean".into()),
                _ => return false,
            }
            true
        }

        fn hook(&self, _name: &str, _log: &Log) -> Option<bool> {
            self.tidy
        }
    }

    fn worker(tidy: Option<bool>) -> Worker {
        Worker {
            skeleton: skeleton(),
            tidy,
            skip_work: false,
        }
    }

    #[test]
    fn test_skeleton_introspection() {
        let s = skeleton();
        assert_eq!(s.name(), "routine");
        assert_eq!(s.step_names(), vec!["open", "work", "clean", "close"]);
        assert_eq!(s.slot_names(), vec!["work", "clean"]);
        assert_eq!(s.hook_default("tidy"), Some(true));
        assert_eq!(s.hook_default("nope"), None);
    }

    #[test]
    fn test_variant_runs_in_order() {
        let mut log = Log::new();
        let report = worker(None).init(&mut log).unwrap();
        assert_eq!(log, vec!["open", "work", "clean", "close"]);
        assert_eq!(report.executed, log);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_variant_hook_false_skips_gated_step() {
        let mut log = Log::new();
        let report = worker(Some(false)).init(&mut log).unwrap();
        assert_eq!(log, vec!["open", "work", "close"]);
        assert_eq!(report.skipped, vec!["clean"]);
    }

    #[test]
    fn test_variant_missing_override_fails_at_call_time() {
        let mut log = Log::new();
        let lazy = Worker {
            skeleton: skeleton(),
            tidy: None,
            skip_work: true,
        };

        let err = lazy.init(&mut log).unwrap_err();

        assert_eq!(
            err,
            TemplateError::MissingOverride {
                skeleton: "routine".into(),
                step: "work".into()
            }
        );
        // Steps before the missing one already ran.
        assert_eq!(log, vec!["open"]);
    }

    #[test]
    fn test_compose_matches_variant() {
        let template = skeleton()
            .compose(
                Slots::new()
                    .step("work", |log: &mut Log| log.push("work".into()))
                    .step("clean", |log: &mut Log| log.push("clean".into())),
            )
            .unwrap();

        let mut composed = Log::new();
        let mut inherited = Log::new();
        let a = template.init(&mut composed).unwrap();
        let b = worker(None).init(&mut inherited).unwrap();

        assert_eq!(composed, inherited);
        assert_eq!(a, b);
    }

    #[test]
    fn test_compose_hook_reads_context() {
        let template = skeleton()
            .compose(
                Slots::new()
                    .step("work", |log: &mut Log| log.push("work".into()))
                    .step("clean", |log: &mut Log| log.push("clean".into()))
                    .hook("tidy", |log: &Log| log.len() > 5),
            )
            .unwrap();

        let mut log = Log::new();
        template.init(&mut log).unwrap();
        assert_eq!(log, vec!["open", "work", "close"]);
    }

    #[test]
    fn test_compose_rejects_missing_slot_before_running() {
        let err = skeleton()
            .compose(Slots::new().step("clean", |log: &mut Log| log.push("clean".into())))
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingOverride {
                skeleton: "routine".into(),
                step: "work".into()
            }
        );
    }

    struct Untidy {
        skeleton: Skeleton<Log>,
        tidy: Option<bool>,
    }

    impl TemplateVariant<Log> for Untidy {
        fn skeleton(&self) -> &Skeleton<Log> {
            &self.skeleton
        }

        fn run_slot(&self, step: &str, log: &mut Log) -> bool {
            if step == "work" {
                log.push("work".into());
                true
            } else {
                false
            }
        }

        fn hook(&self, _name: &str, _log: &Log) -> Option<bool> {
            self.tidy
        }
    }

    fn work_only(tidy: Option<bool>) -> Result<Template<Log>, TemplateError> {
        let mut slots = Slots::new().step("work", |log: &mut Log| log.push("work".into()));
        if let Some(tidy) = tidy {
            slots = slots.hook("tidy", move |_: &Log| tidy);
        }
        skeleton().compose(slots)
    }

    #[test]
    fn test_gated_slot_may_be_omitted_when_hook_declines() {
        let inherited = Untidy {
            skeleton: skeleton(),
            tidy: Some(false),
        };
        let mut a = Log::new();
        let mut b = Log::new();

        let by_trait = inherited.init(&mut a).unwrap();
        let by_slots = work_only(Some(false)).unwrap().init(&mut b).unwrap();

        assert_eq!(a, vec!["open", "work", "close"]);
        assert_eq!(a, b);
        assert_eq!(by_trait, by_slots);
        assert_eq!(by_slots.skipped, vec!["clean"]);
    }

    #[test]
    fn test_omitted_gated_slot_fails_when_reached() {
        let inherited = Untidy {
            skeleton: skeleton(),
            tidy: None,
        };
        let expected = TemplateError::MissingOverride {
            skeleton: "routine".into(),
            step: "clean".into(),
        };
        let mut a = Log::new();
        let mut b = Log::new();

        assert_eq!(inherited.init(&mut a).unwrap_err(), expected);
        let template = work_only(None).unwrap();
        assert_eq!(template.init(&mut b).unwrap_err(), expected);
        assert_eq!(a, vec!["open", "work"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_compose_rejects_bad_names() {
        let unknown = skeleton()
            .compose(Slots::new().step("dance", |_: &mut Log| {}))
            .err()
            .unwrap();
        assert!(matches!(unknown, TemplateError::UnknownStep { step, .. } if step == "dance"));

        let fixed = skeleton()
            .compose(Slots::new().step("open", |_: &mut Log| {}))
            .err()
            .unwrap();
        assert!(matches!(fixed, TemplateError::NotOverridable { step, .. } if step == "open"));

        let hook = skeleton()
            .compose(
                Slots::new()
                    .step("work", |_: &mut Log| {})
                    .step("clean", |_: &mut Log| {})
                    .hook("sing", |_: &Log| true),
            )
            .err()
            .unwrap();
        assert!(matches!(hook, TemplateError::UnknownHook { hook, .. } if hook == "sing"));
    }

    #[test]
    fn test_builder_validation() {
        let dup = Skeleton::<Log>::builder("dup").slot("a").slot("a").build().unwrap_err();
        assert!(matches!(dup, TemplateError::DuplicateStep { step, .. } if step == "a"));

        let ungated = Skeleton::<Log>::builder("gate")
            .gated_slot("a", "missing")
            .build()
            .unwrap_err();
        assert!(matches!(ungated, TemplateError::UnknownHook { hook, .. } if hook == "missing"));
    }

    #[test]
    fn test_gated_fixed_uses_default() {
        let s = Skeleton::<Log>::builder("quiet")
            .hook("loud", false)
            .gated_fixed("shout", "loud", |log: &mut Log| log.push("shout".into()))
            .build()
            .unwrap();
        let template = s.compose(Slots::new()).unwrap();

        let mut log = Log::new();
        let report = template.init(&mut log).unwrap();
        assert!(log.is_empty());
        assert_eq!(report.skipped, vec!["shout"]);
    }
}
