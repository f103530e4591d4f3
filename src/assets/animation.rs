use crate::asset::impl_asset;
use crate::{AssetCore, AssetKind, Uuid};
use indexmap::IndexMap;

// One keyed change applied while the animation plays. target addresses what
// is being animated ("body/sprite", "emitter/rate"), value is the serialized
// payload the runtime applies.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStep
{
    pub time: f32,
    pub target: String,
    pub value: String,
}

// A change applied once when the animation stops or restarts.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationReset
{
    pub target: String,
    pub value: String,
}

pub struct AnimationAsset
{
    core: AssetCore,
    length: f32,
    loops: bool,
    // ordered by time ascending
    steps: Vec<AnimationStep>,
    resets: Vec<AnimationReset>,
}

impl AnimationAsset
{
    #[must_use]
    pub fn new(core: AssetCore, length: f32, loops: bool, steps: Vec<AnimationStep>, resets: Vec<AnimationReset>) -> Self
    {
        Self { core, length, loops, steps, resets }
    }

    #[inline] #[must_use]
    pub fn length(&self) -> f32 { self.length }

    #[inline] #[must_use]
    pub fn loops(&self) -> bool { self.loops }

    #[inline] #[must_use]
    pub fn steps(&self) -> &[AnimationStep] { &self.steps }

    #[inline] #[must_use]
    pub fn resets(&self) -> &[AnimationReset] { &self.resets }
}

impl_asset!(AnimationAsset, AssetKind::Animation);

// A named set of animations and which one plays first.
pub struct AnimatorAsset
{
    core: AssetCore,
    animations: IndexMap<String, Uuid>,
    initial: String,
}

impl AnimatorAsset
{
    #[must_use]
    pub fn new(core: AssetCore, animations: IndexMap<String, Uuid>, initial: String) -> Self
    {
        Self { core, animations, initial }
    }

    #[inline] #[must_use]
    pub fn animations(&self) -> &IndexMap<String, Uuid> { &self.animations }

    #[inline] #[must_use]
    pub fn initial(&self) -> &str { &self.initial }

    #[must_use]
    pub fn animation(&self, name: &str) -> Option<Uuid>
    {
        self.animations.get(name).copied()
    }
}

impl_asset!(AnimatorAsset, AssetKind::Animator, deps: |a: &AnimatorAsset| a.animations.values().copied().collect());
