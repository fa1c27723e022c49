#![cfg_attr(not(target_os = "windows"), allow(dead_code, unused_variables))]

#[cfg(target_os = "windows")]
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;

/// Polled keyboard state, queried once per frame.
pub trait KeySource {
    /// Whether the key with virtual-key code `vk` is currently held.
    fn is_down(&self, vk: u16) -> bool;
}

impl<F> KeySource for F
where
    F: Fn(u16) -> bool,
{
    fn is_down(&self, vk: u16) -> bool {
        self(vk)
    }
}

/// Key source for headless hosts: nothing is ever pressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeys;

impl KeySource for NoKeys {
    fn is_down(&self, _vk: u16) -> bool {
        false
    }
}

/// System-wide asynchronous key state.
///
/// Always reports released keys on non-Windows platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsyncKeySource;

impl KeySource for AsyncKeySource {
    #[cfg(target_os = "windows")]
    fn is_down(&self, vk: u16) -> bool {
        // SAFETY: GetAsyncKeyState has no preconditions beyond a key code.
        let state = unsafe { GetAsyncKeyState(i32::from(vk)) };
        (state as u16) & 0x8000 != 0
    }

    #[cfg(not(target_os = "windows"))]
    fn is_down(&self, vk: u16) -> bool {
        false
    }
}

/// Rising-edge detector over a polled key level.
///
/// A held key fires once; it has to be released before it fires again.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEdge {
    was_down: bool,
}

impl KeyEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current level; returns true on the released -> pressed transition.
    pub fn update(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_fires_once_per_press() {
        let mut edge = KeyEdge::new();
        let levels = [false, true, true, true, false, true, false, false];
        let fired: Vec<bool> = levels.iter().map(|&down| edge.update(down)).collect();

        assert_eq!(
            fired,
            [false, true, false, false, false, true, false, false]
        );
    }

    #[test]
    fn test_key_held_from_start_fires_once() {
        let mut edge = KeyEdge::new();
        assert!(edge.update(true));
        assert!(!edge.update(true));
    }

    #[test]
    fn test_closure_key_source() {
        let keys = |vk: u16| vk == 0x2E;
        assert!(keys.is_down(0x2E));
        assert!(!keys.is_down(0x2D));
        assert!(!NoKeys.is_down(0x2E));
    }
}
