//! Render memoization keyed on the props that affect visual output

/// Props that can tell whether a redraw is needed from a small comparison key
pub trait RenderKey {
    type Key: PartialEq + Clone;

    fn render_key(&self) -> Self::Key;
}

/// A built view that is only rebuilt when its props' render key changes
#[derive(Debug)]
pub struct Memo<K, V> {
    key: K,
    view: V,
    renders: u32,
}

impl<K: PartialEq + Clone, V> Memo<K, V> {
    pub fn new<P>(props: &P, build: impl FnOnce(&P) -> V) -> Self
    where
        P: RenderKey<Key = K>,
    {
        Self {
            key: props.render_key(),
            view: build(props),
            renders: 1,
        }
    }

    /// Rebuild the view if the key changed. Returns whether it did.
    pub fn update<P>(&mut self, props: &P, build: impl FnOnce(&P) -> V) -> bool
    where
        P: RenderKey<Key = K>,
    {
        let key = props.render_key();
        if key == self.key {
            return false;
        }
        self.key = key;
        self.view = build(props);
        self.renders += 1;
        true
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn renders(&self) -> u32 {
        self.renders
    }
}
