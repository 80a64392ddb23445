//! Coffee or tea: one brewing routine, two drinks.
//!
//! Boiling water is shared, brewing, pouring and condiments differ per drink,
//! and the customer may decline condiments. Every drink is available both as a
//! [`TemplateVariant`] and as a composed [`Template`].

use crate::core::error::TemplateError;
use crate::core::template::{Skeleton, Slots, Template, TemplateVariant};
use crate::core::transcript::Transcript;

pub const BOIL_WATER: &str = "boilWater";
pub const BREW: &str = "brew";
pub const POUR_IN_CUP: &str = "pourInCup";
pub const ADD_CONDIMENTS: &str = "addCondiments";
pub const WANTS_CONDIMENTS: &str = "customerWantsCondiments";

pub const BOILING: &str = "把水煮沸";

/// The lines a drink prints for its own steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipe {
    pub brew: &'static str,
    pub pour_in_cup: &'static str,
    pub add_condiments: &'static str,
}

pub const COFFEE: Recipe = Recipe {
    brew: "用沸水冲泡咖啡",
    pour_in_cup: "把咖啡倒进杯子",
    add_condiments: "加糖和牛奶",
};

pub const TEA: Recipe = Recipe {
    brew: "用沸水浸泡茶叶",
    pour_in_cup: "把茶倒进杯子",
    add_condiments: "加柠檬",
};

impl Recipe {
    fn line(&self, step: &str) -> Option<&'static str> {
        match step {
            BREW => Some(self.brew),
            POUR_IN_CUP => Some(self.pour_in_cup),
            ADD_CONDIMENTS => Some(self.add_condiments),
            _ => None,
        }
    }
}

/// Boil, brew, pour, and add condiments if the customer wants them.
pub fn beverage() -> Result<Skeleton<Transcript>, TemplateError> {
    Skeleton::builder("Beverage")
        .fixed(BOIL_WATER, |out: &mut Transcript| out.line(BOILING))
        .slot(BREW)
        .slot(POUR_IN_CUP)
        .hook(WANTS_CONDIMENTS, true)
        .gated_slot(ADD_CONDIMENTS, WANTS_CONDIMENTS)
        .build()
}

/// A drink that extends the beverage skeleton by overriding its slots.
pub struct Drink {
    skeleton: Skeleton<Transcript>,
    recipe: Recipe,
    wants_condiments: Option<bool>,
}

impl Drink {
    pub fn new(recipe: Recipe) -> Result<Self, TemplateError> {
        Ok(Drink {
            skeleton: beverage()?,
            recipe,
            wants_condiments: None,
        })
    }

    /// Answers the condiments question up front instead of asking.
    pub fn with_condiments(mut self, wanted: bool) -> Self {
        self.wants_condiments = Some(wanted);
        self
    }
}

impl TemplateVariant<Transcript> for Drink {
    fn skeleton(&self) -> &Skeleton<Transcript> {
        &self.skeleton
    }

    fn run_slot(&self, step: &str, out: &mut Transcript) -> bool {
        match self.recipe.line(step) {
            Some(line) => {
                out.line(line);
                true
            }
            None => false,
        }
    }

    fn hook(&self, name: &str, _out: &Transcript) -> Option<bool> {
        match name {
            WANTS_CONDIMENTS => self.wants_condiments,
            _ => None,
        }
    }
}

/// The same drink, built by handing the slot bodies to the skeleton.
pub fn composed(recipe: Recipe, wants_condiments: Option<bool>) -> Result<Template<Transcript>, TemplateError> {
    let mut slots = Slots::new()
        .step(BREW, move |out: &mut Transcript| out.line(recipe.brew))
        .step(POUR_IN_CUP, move |out: &mut Transcript| out.line(recipe.pour_in_cup))
        .step(ADD_CONDIMENTS, move |out: &mut Transcript| {
            out.line(recipe.add_condiments)
        });
    if let Some(wanted) = wants_condiments {
        slots = slots.hook(WANTS_CONDIMENTS, move |_: &Transcript| wanted);
    }
    beverage()?.compose(slots)
}
