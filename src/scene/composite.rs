use std::sync::Arc;

use crate::{
    animation::anim::Animation,
    foundation::error::{LanimError, LanimResult},
    render::surface::{FrameBuffer, Paint},
    scene::{Align, Alignable, Morphable, Movable, Scalable, lerp, shapes::Nil},
};

/// Ordered collection painted front to back.
///
/// Morphing pairs items up by position, so both groups must have the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct Group<P> {
    items: Vec<P>,
}

impl<P> Default for Group<P> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<P> Group<P> {
    /// Group of `items`, painted in order.
    pub fn new(items: Vec<P>) -> Self {
        Self { items }
    }

    /// Borrow the items.
    pub fn items(&self) -> &[P] {
        &self.items
    }

    /// Take the items out.
    pub fn into_items(self) -> Vec<P> {
        self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Return `true` for an empty group.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copy with `item` appended.
    pub fn add(&self, item: P) -> Self
    where
        P: Clone,
    {
        let mut items = self.items.clone();
        items.push(item);
        Self { items }
    }

    /// Copy with every item of `other` appended.
    pub fn concat(&self, other: &Self) -> Self
    where
        P: Clone,
    {
        let mut items = self.items.clone();
        items.extend(other.items.iter().cloned());
        Self { items }
    }

    /// [`Morphable::morphed`] that reports a length mismatch instead of truncating.
    pub fn try_morphed(&self, other: &Self, t: f64) -> LanimResult<Self>
    where
        P: Morphable,
    {
        self.check_morph(other)?;
        Ok(self.morphed(other, t))
    }
}

impl<P: Movable> Group<P> {
    /// Average of the item positions, or `None` for an empty group.
    pub fn center(&self) -> Option<(f64, f64)> {
        if self.items.is_empty() {
            return None;
        }
        let n = self.items.len() as f64;
        let (sx, sy) = self.items.iter().fold((0.0, 0.0), |(sx, sy), item| {
            let (x, y) = item.position();
            (sx + x, sy + y)
        });
        Some((sx / n, sy / n))
    }
}

impl<P> FromIterator<P> for Group<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, P> IntoIterator for &'a Group<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<P: Movable> Movable for Group<P> {
    // An empty group sits at the origin.
    fn position(&self) -> (f64, f64) {
        self.center().unwrap_or((0.0, 0.0))
    }

    fn moved(&self, dx: f64, dy: f64) -> Self {
        self.items.iter().map(|item| item.moved(dx, dy)).collect()
    }
}

impl<P: Scalable> Scalable for Group<P> {
    fn scaled(&self, factor: f64) -> Self {
        let (cx, cy) = self.position();
        self.scaled_about(factor, cx, cy)
    }

    fn scaled_about(&self, factor: f64, cx: f64, cy: f64) -> Self {
        self.items
            .iter()
            .map(|item| item.scaled_about(factor, cx, cy))
            .collect()
    }
}

impl<P: Morphable> Morphable for Group<P> {
    fn check_morph(&self, other: &Self) -> LanimResult<()> {
        if self.items.len() != other.items.len() {
            return Err(LanimError::shape(format!(
                "cannot morph a group of {} items into a group of {}",
                self.items.len(),
                other.items.len()
            )));
        }
        self.items
            .iter()
            .zip(&other.items)
            .try_for_each(|(a, b)| a.check_morph(b))
    }

    fn morphed(&self, other: &Self, t: f64) -> Self {
        self.items
            .iter()
            .zip(&other.items)
            .map(|(a, b)| a.morphed(b, t))
            .collect()
    }
}

impl<P: Alignable> Alignable for Group<P> {
    fn aligned(&self, align: Align) -> Self {
        self.items.iter().map(|item| item.aligned(align)).collect()
    }
}

impl<P: Paint> Paint for Group<P> {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        self.items.iter().try_for_each(|item| item.paint(fb))
    }
}

/// Two differently typed values; `p` is painted before `q`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pair<P, Q> {
    /// Painted first.
    pub p: P,
    /// Painted second.
    pub q: Q,
}

impl<P, Q> Pair<P, Q> {
    /// Pair `p` under `q`.
    pub fn new(p: P, q: Q) -> Self {
        Self { p, q }
    }

    /// Swap the paint order.
    pub fn flip(self) -> Pair<Q, P> {
        Pair::new(self.q, self.p)
    }
}

impl<P: Movable, Q: Movable> Movable for Pair<P, Q> {
    fn position(&self) -> (f64, f64) {
        let (px, py) = self.p.position();
        let (qx, qy) = self.q.position();
        ((px + qx) / 2.0, (py + qy) / 2.0)
    }

    fn moved(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.p.moved(dx, dy), self.q.moved(dx, dy))
    }
}

impl<P: Scalable, Q: Scalable> Scalable for Pair<P, Q> {
    fn scaled(&self, factor: f64) -> Self {
        let (cx, cy) = self.position();
        self.scaled_about(factor, cx, cy)
    }

    fn scaled_about(&self, factor: f64, cx: f64, cy: f64) -> Self {
        Self::new(
            self.p.scaled_about(factor, cx, cy),
            self.q.scaled_about(factor, cx, cy),
        )
    }
}

impl<P: Morphable, Q: Morphable> Morphable for Pair<P, Q> {
    fn check_morph(&self, other: &Self) -> LanimResult<()> {
        self.p.check_morph(&other.p)?;
        self.q.check_morph(&other.q)
    }

    fn morphed(&self, other: &Self, t: f64) -> Self {
        Self::new(self.p.morphed(&other.p, t), self.q.morphed(&other.q, t))
    }
}

impl<P: Paint, Q: Paint> Paint for Pair<P, Q> {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        self.p.paint(fb)?;
        self.q.paint(fb)
    }
}

/// Animate the left member of a pair while `q` holds still.
pub fn lpair<P, Q>(animation: Animation<P>, q: Q) -> Animation<Pair<P, Q>>
where
    P: 'static,
    Q: Clone + Send + Sync + 'static,
{
    animation.map(move |p| Pair::new(p, q.clone()))
}

/// Animate the right member of a pair while `p` holds still.
pub fn rpair<P, Q>(p: P, animation: Animation<Q>) -> Animation<Pair<P, Q>>
where
    P: Clone + Send + Sync + 'static,
    Q: 'static,
{
    animation.map(move |q| Pair::new(p.clone(), q))
}

/// Animate both members; the shorter one holds its last frame.
pub fn lrpair_longest<P: 'static, Q: 'static>(
    left: Animation<P>,
    right: Animation<Q>,
) -> Animation<Pair<P, Q>> {
    left.par_longest(right).map(|(p, q)| Pair::new(p, q))
}

/// Animate both members for the shorter duration; the longer one is cut off.
pub fn lrpair_shortest<P: 'static, Q: 'static>(
    left: Animation<P>,
    right: Animation<Q>,
) -> Animation<Pair<P, Q>> {
    left.par_shortest(right).map(|(p, q)| Pair::new(p, q))
}

/// One of two alternatives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Select<P, Q> {
    /// The left alternative.
    P(P),
    /// The right alternative.
    Q(Q),
}

/// Strategy for turning a left value into a right value, sampled at progress `t`.
pub type Transition<P, Q> = Arc<dyn Fn(&P, &Q, f64) -> Select<P, Q> + Send + Sync>;

/// Either-or value that knows how to transition between its alternatives.
///
/// Morphing two values with the same tag blends the inner values. Morphing across tags
/// samples the transition; the right-to-left direction runs it backwards (at `1 - t`).
pub struct Sum<P, Q> {
    item: Select<P, Q>,
    transition: Transition<P, Q>,
}

impl<P: Clone, Q: Clone> Clone for Sum<P, Q> {
    fn clone(&self) -> Self {
        Self {
            item: self.item.clone(),
            transition: Arc::clone(&self.transition),
        }
    }
}

impl<P: std::fmt::Debug, Q: std::fmt::Debug> std::fmt::Debug for Sum<P, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sum")
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}

impl<P, Q> Sum<P, Q> {
    /// Sum holding `item`.
    pub fn new(
        item: Select<P, Q>,
        transition: impl Fn(&P, &Q, f64) -> Select<P, Q> + Send + Sync + 'static,
    ) -> Self {
        Self {
            item,
            transition: Arc::new(transition),
        }
    }

    /// Sum that jumps from left to right halfway through a transition.
    pub fn cut(item: Select<P, Q>) -> Self
    where
        P: Clone + 'static,
        Q: Clone + 'static,
    {
        Self::new(item, |p, q, t| {
            if t < 0.5 {
                Select::P(p.clone())
            } else {
                Select::Q(q.clone())
            }
        })
    }

    /// Current alternative.
    pub fn item(&self) -> &Select<P, Q> {
        &self.item
    }

    /// Same transition, different alternative.
    pub fn with_item(&self, item: Select<P, Q>) -> Self {
        Self {
            item,
            transition: Arc::clone(&self.transition),
        }
    }

    /// Same transition holding `p`.
    pub fn with_left(&self, p: P) -> Self {
        self.with_item(Select::P(p))
    }

    /// Same transition holding `q`.
    pub fn with_right(&self, q: Q) -> Self {
        self.with_item(Select::Q(q))
    }

    /// Transform whichever alternative is present, keeping the transition.
    pub fn map(&self, fp: impl FnOnce(&P) -> P, fq: impl FnOnce(&Q) -> Q) -> Self {
        match &self.item {
            Select::P(p) => self.with_left(fp(p)),
            Select::Q(q) => self.with_right(fq(q)),
        }
    }

    /// Reduce whichever alternative is present to a common type.
    pub fn dispatch<A>(&self, fp: impl FnOnce(&P) -> A, fq: impl FnOnce(&Q) -> A) -> A {
        match &self.item {
            Select::P(p) => fp(p),
            Select::Q(q) => fq(q),
        }
    }
}

impl<P: Movable, Q: Movable> Movable for Sum<P, Q> {
    fn position(&self) -> (f64, f64) {
        self.dispatch(|p| p.position(), |q| q.position())
    }

    fn moved(&self, dx: f64, dy: f64) -> Self {
        self.map(|p| p.moved(dx, dy), |q| q.moved(dx, dy))
    }
}

impl<P: Scalable, Q: Scalable> Scalable for Sum<P, Q> {
    fn scaled(&self, factor: f64) -> Self {
        self.map(|p| p.scaled(factor), |q| q.scaled(factor))
    }

    fn scaled_about(&self, factor: f64, cx: f64, cy: f64) -> Self {
        self.map(
            |p| p.scaled_about(factor, cx, cy),
            |q| q.scaled_about(factor, cx, cy),
        )
    }
}

impl<P: Morphable, Q: Morphable> Morphable for Sum<P, Q> {
    fn check_morph(&self, other: &Self) -> LanimResult<()> {
        match (&self.item, &other.item) {
            (Select::P(a), Select::P(b)) => a.check_morph(b),
            (Select::Q(a), Select::Q(b)) => a.check_morph(b),
            _ => Ok(()),
        }
    }

    fn morphed(&self, other: &Self, t: f64) -> Self {
        match (&self.item, &other.item) {
            (Select::P(a), Select::P(b)) => self.with_left(a.morphed(b, t)),
            (Select::Q(a), Select::Q(b)) => self.with_right(a.morphed(b, t)),
            (Select::P(p), Select::Q(q)) => self.with_item((self.transition)(p, q, t)),
            (Select::Q(q), Select::P(p)) => self.with_item((self.transition)(p, q, 1.0 - t)),
        }
    }
}

impl<P: Paint, Q: Paint> Paint for Sum<P, Q> {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        match &self.item {
            Select::P(p) => p.paint(fb),
            Select::Q(q) => q.paint(fb),
        }
    }
}

/// A value that may be absent; absence is a [`Nil`] marking where it would be.
pub type Maybe<P> = Sum<P, Nil>;

impl<P> Sum<P, Nil>
where
    P: Scalable + Morphable + 'static,
{
    /// Present `p`. Morphing to an absent value shrinks it into the [`Nil`].
    pub fn just(p: P) -> Self {
        Self::new(Select::P(p), disappear_into_nil)
    }

    /// Absent value at `(x, y)`. Morphing to a present value grows it out of that point.
    pub fn none(x: f64, y: f64) -> Self {
        Self::new(Select::Q(Nil::new(x, y)), disappear_into_nil)
    }
}

/// Shrink `p` into `nil`, becoming the [`Nil`] itself once `t` reaches 1.
pub fn disappear_into_nil<P>(p: &P, nil: &Nil, t: f64) -> Select<P, Nil>
where
    P: Scalable + Morphable,
{
    if t >= 1.0 {
        Select::Q(*nil)
    } else {
        Select::P(p.morphed(&p.scaled_about(0.0, nil.x, nil.y), t))
    }
}

/// Grow `p` out of `nil`: [`disappear_into_nil`] run backwards.
pub fn appear_from_nil<P>(p: &P, nil: &Nil, t: f64) -> Select<P, Nil>
where
    P: Scalable + Morphable,
{
    disappear_into_nil(p, nil, 1.0 - t)
}

/// Paints its child at reduced opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Opacity<P> {
    child: P,
    opacity: f64,
}

fn check_opacity(opacity: f64) -> LanimResult<()> {
    if (0.0..=1.0).contains(&opacity) {
        Ok(())
    } else {
        Err(LanimError::construction(format!(
            "opacity must be within [0, 1], got {opacity}"
        )))
    }
}

impl<P> Opacity<P> {
    /// Wrap `child` at `opacity` in `[0, 1]`.
    pub fn new(child: P, opacity: f64) -> LanimResult<Self> {
        check_opacity(opacity)?;
        Ok(Self { child, opacity })
    }

    /// Wrapped value.
    pub fn child(&self) -> &P {
        &self.child
    }

    /// Current opacity.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// One-second fade from the current opacity to `target`.
    pub fn fade(self, target: f64) -> LanimResult<Animation<Self>>
    where
        P: Clone + Send + Sync + 'static,
    {
        check_opacity(target)?;
        let start = self.opacity;
        Animation::new(1.0, move |t| Self {
            child: self.child.clone(),
            opacity: lerp(start, target, t),
        })
    }
}

impl<P: Movable> Movable for Opacity<P> {
    fn position(&self) -> (f64, f64) {
        self.child.position()
    }

    fn moved(&self, dx: f64, dy: f64) -> Self {
        Self {
            child: self.child.moved(dx, dy),
            opacity: self.opacity,
        }
    }
}

impl<P: Scalable> Scalable for Opacity<P> {
    fn scaled(&self, factor: f64) -> Self {
        Self {
            child: self.child.scaled(factor),
            opacity: self.opacity,
        }
    }

    fn scaled_about(&self, factor: f64, cx: f64, cy: f64) -> Self {
        Self {
            child: self.child.scaled_about(factor, cx, cy),
            opacity: self.opacity,
        }
    }
}

impl<P: Morphable> Morphable for Opacity<P> {
    fn check_morph(&self, other: &Self) -> LanimResult<()> {
        self.child.check_morph(&other.child)
    }

    fn morphed(&self, other: &Self, t: f64) -> Self {
        Self {
            child: self.child.morphed(&other.child, t),
            opacity: lerp(self.opacity, other.opacity, t),
        }
    }
}

impl<P: Paint> Paint for Opacity<P> {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        if self.opacity <= 0.0 {
            return Ok(());
        }
        if self.opacity >= 1.0 {
            return self.child.paint(fb);
        }
        fb.push_opacity(self.opacity as f32);
        let painted = self.child.paint(fb);
        fb.pop_layer();
        painted
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/composite.rs"]
mod tests;
