//! # Controller Registry
//!
//! Owns every active [`ControllerConfiguration`] and enforces that at most one
//! exists per [`ControllerIdentity`].
//!
//! ## Lifecycle
//!
//! ```text
//! activate ──> configuration + adapter ──> deactivate
//!                      │
//!          serialize / deserialize (see persistence)
//! ```
//!
//! A freshly deserialized registry has new adapters but no button callbacks;
//! hosts call [`Registry::rebind_callbacks`] for each controller they drive.

pub mod configuration;
pub mod notification;
mod persistence;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::controller::{create_adapter, ButtonCallback, ControllerAdapter, ControllerIdentity, RawSample};
use crate::error::{FlyByWireError, Result};

pub use configuration::ControllerConfiguration;
pub use notification::{NotificationSink, Placement, TracingNotifier};

/// How long the activation notification stays on screen.
pub const ACTIVATION_NOTIFICATION_DURATION: Duration = Duration::from_secs(1);

fn default_notifier() -> Box<dyn NotificationSink> {
    Box::new(TracingNotifier)
}

/// Collection of active controller configurations.
#[derive(Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    controllers: Vec<ControllerConfiguration>,

    #[serde(skip, default = "default_notifier")]
    notifier: Box<dyn NotificationSink>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("controllers", &self.controllers)
            .finish_non_exhaustive()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry that logs notifications.
    #[must_use]
    pub fn new() -> Self {
        Self {
            controllers: Vec::new(),
            notifier: default_notifier(),
        }
    }

    /// Replaces the notification sink.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Box<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn set_notifier(&mut self, notifier: Box<dyn NotificationSink>) {
        self.notifier = notifier;
    }

    // ==================== Activation ====================

    /// Activates the controller behind `identity`.
    ///
    /// Creates an adapter with the default curve, registers both callbacks,
    /// seeds the default presets and announces the controller by name.
    /// Returns `false` and changes nothing if the identity is already active;
    /// the callbacks are dropped in that case.
    pub fn activate(
        &mut self,
        identity: ControllerIdentity,
        on_press: ButtonCallback,
        on_release: ButtonCallback,
    ) -> bool {
        if self.contains(identity) {
            debug!("{} already active", identity);
            return false;
        }

        let mut adapter = create_adapter(identity);
        adapter.set_button_pressed_callback(on_press);
        adapter.set_button_released_callback(on_release);
        let name = adapter.controller_name();

        self.controllers.push(ControllerConfiguration::with_adapter(adapter));

        info!("Activated {} ({})", identity, name);
        self.notifier.post(
            &format!("CONTROLLER: {}", name),
            ACTIVATION_NOTIFICATION_DURATION,
            Placement::UpperCenter,
        );
        true
    }

    /// Removes the configuration for `identity` and releases its adapter.
    ///
    /// Returns `false` if the identity was not active.
    pub fn deactivate(&mut self, identity: ControllerIdentity) -> bool {
        let Some(position) = self.position(identity) else {
            debug!("{} not active, nothing to deactivate", identity);
            return false;
        };

        let mut config = self.controllers.remove(position);
        drop(config.take_adapter());
        info!("Deactivated {}", identity);
        true
    }

    /// Replaces both button callbacks of an active controller.
    ///
    /// Returns `false` if the identity is not active.
    pub fn rebind_callbacks(
        &mut self,
        identity: ControllerIdentity,
        on_press: ButtonCallback,
        on_release: ButtonCallback,
    ) -> bool {
        let Some(adapter) = self
            .get_by_identity_mut(identity)
            .and_then(ControllerConfiguration::adapter_mut)
        else {
            return false;
        };
        adapter.set_button_pressed_callback(on_press);
        adapter.set_button_released_callback(on_release);
        true
    }

    /// Feeds one polled frame to an active controller's adapter.
    ///
    /// Returns `false` if the identity is not active.
    pub fn update(&mut self, identity: ControllerIdentity, sample: &RawSample) -> bool {
        match self
            .get_by_identity_mut(identity)
            .and_then(ControllerConfiguration::adapter_mut)
        {
            Some(adapter) => {
                adapter.update(sample);
                true
            }
            None => false,
        }
    }

    // ==================== Lookup ====================

    /// Finds the configuration holding this exact adapter instance.
    #[must_use]
    pub fn get_by_adapter(&self, adapter: &dyn ControllerAdapter) -> Option<&ControllerConfiguration> {
        self.controllers.iter().find(|config| {
            config
                .adapter()
                .is_some_and(|bound| std::ptr::addr_eq(bound, adapter))
        })
    }

    pub fn get_by_adapter_mut(&mut self, adapter: &dyn ControllerAdapter) -> Option<&mut ControllerConfiguration> {
        self.controllers.iter_mut().find(|config| {
            config
                .adapter()
                .is_some_and(|bound| std::ptr::addr_eq(bound, adapter))
        })
    }

    #[must_use]
    pub fn get_by_identity(&self, identity: ControllerIdentity) -> Option<&ControllerConfiguration> {
        self.controllers.iter().find(|config| config.identity() == identity)
    }

    pub fn get_by_identity_mut(&mut self, identity: ControllerIdentity) -> Option<&mut ControllerConfiguration> {
        self.controllers.iter_mut().find(|config| config.identity() == identity)
    }

    #[must_use]
    pub fn contains(&self, identity: ControllerIdentity) -> bool {
        self.position(identity).is_some()
    }

    fn position(&self, identity: ControllerIdentity) -> Option<usize> {
        self.controllers.iter().position(|config| config.identity() == identity)
    }

    /// Active configurations in activation order.
    #[must_use]
    pub fn controllers(&self) -> &[ControllerConfiguration] {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> impl Iterator<Item = &mut ControllerConfiguration> {
        self.controllers.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    // ==================== Persistence Hooks ====================

    /// Runs the pre-save hook of every configuration.
    ///
    /// # Errors
    ///
    /// Stops at the first configuration that cannot be captured.
    pub(crate) fn on_pre_serialize(&mut self) -> Result<()> {
        for config in &mut self.controllers {
            config.on_pre_serialize()?;
        }
        Ok(())
    }

    /// Checks identity uniqueness, then runs the post-load hook of every
    /// configuration.
    ///
    /// # Errors
    ///
    /// - `DuplicateIdentity` if two configurations share an identity
    /// - `AxisCountMismatch` if a calibration snapshot does not fit its adapter
    pub(crate) fn on_post_deserialize(&mut self) -> Result<()> {
        let mut seen = HashSet::new();
        for config in &self.controllers {
            if !seen.insert(config.identity()) {
                return Err(FlyByWireError::DuplicateIdentity(config.identity()));
            }
        }

        for config in &mut self.controllers {
            config.on_post_deserialize()?;
        }
        Ok(())
    }

    /// Drops every persistence snapshot.
    fn release_persisted(&mut self) {
        for config in &mut self.controllers {
            config.release_persisted();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::notification::MockNotificationSink;
    use super::*;
    use crate::controller::{ButtonMask, CurveType, InputWrapper};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pad(index: usize) -> ControllerIdentity {
        ControllerIdentity::new(InputWrapper::XInput, index)
    }

    fn noop() -> ButtonCallback {
        Box::new(|_, _| {})
    }

    fn quiet_registry() -> Registry {
        let mut mock = MockNotificationSink::new();
        mock.expect_post().return_const(());
        Registry::new().with_notifier(Box::new(mock))
    }

    // ==================== Activation Tests ====================

    #[test]
    fn test_activate_creates_configuration() {
        let mut registry = quiet_registry();
        assert!(registry.activate(pad(0), noop(), noop()));

        let config = registry.get_by_identity(pad(0)).unwrap();
        assert_eq!(config.current_preset_index(), 0);
        assert!(!config.presets().is_empty());
        let adapter = config.adapter().unwrap();
        assert!(adapter.has_callbacks());
        assert_eq!(adapter.analog_evaluation_curve(), CurveType::XSquared);
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut registry = quiet_registry();
        assert!(registry.activate(pad(0), noop(), noop()));
        let first = std::ptr::from_ref(registry.get_by_identity(pad(0)).unwrap().adapter().unwrap()).cast::<u8>();

        assert!(!registry.activate(pad(0), noop(), noop()));
        assert_eq!(registry.len(), 1);
        let second = std::ptr::from_ref(registry.get_by_identity(pad(0)).unwrap().adapter().unwrap()).cast::<u8>();
        assert_eq!(first, second);
    }

    #[test]
    fn test_activate_posts_notification_once() {
        let mut mock = MockNotificationSink::new();
        mock.expect_post()
            .withf(|message, duration, placement| {
                message == "CONTROLLER: XInput Gamepad #0"
                    && *duration == ACTIVATION_NOTIFICATION_DURATION
                    && *placement == Placement::UpperCenter
            })
            .times(1)
            .return_const(());

        let mut registry = Registry::new().with_notifier(Box::new(mock));
        registry.activate(pad(0), noop(), noop());
        // Second activation is a no-op and must not notify again
        registry.activate(pad(0), noop(), noop());
    }

    #[test]
    fn test_activate_activate_deactivate() {
        let mut registry = quiet_registry();
        let a = pad(0);
        let b = ControllerIdentity::new(InputWrapper::Sdl, 0);

        registry.activate(a, noop(), noop());
        registry.activate(b, noop(), noop());
        assert_eq!(registry.len(), 2);

        assert!(registry.deactivate(a));
        assert_eq!(registry.len(), 1);
        assert!(registry.get_by_identity(a).is_none());
        assert!(registry.get_by_identity(b).is_some());
    }

    #[test]
    fn test_activate_twice_then_deactivate_leaves_registry_empty() {
        let mut registry = quiet_registry();

        assert!(registry.activate(pad(0), noop(), noop()));
        assert!(!registry.activate(pad(0), noop(), noop()));
        assert_eq!(registry.len(), 1);

        assert!(registry.deactivate(pad(0)));
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
        assert!(registry.get_by_identity(pad(0)).is_none());
    }

    #[test]
    fn test_deactivate_absent_is_noop() {
        let mut registry = quiet_registry();
        registry.activate(pad(0), noop(), noop());
        assert!(!registry.deactivate(pad(3)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reactivate_after_deactivate_gets_fresh_configuration() {
        let mut registry = quiet_registry();
        registry.activate(pad(0), noop(), noop());
        registry
            .get_by_identity_mut(pad(0))
            .unwrap()
            .set_analog_input_curve(CurveType::XCubed);

        registry.deactivate(pad(0));
        assert!(registry.activate(pad(0), noop(), noop()));
        assert_eq!(
            registry.get_by_identity(pad(0)).unwrap().analog_input_curve(),
            CurveType::XSquared
        );
    }

    // ==================== Callback Tests ====================

    #[test]
    fn test_callbacks_fire_through_update() {
        let mut registry = quiet_registry();
        let events = Rc::new(RefCell::new(Vec::new()));
        let pressed: ButtonCallback = {
            let events = Rc::clone(&events);
            Box::new(move |identity, button| events.borrow_mut().push((identity, button)))
        };

        registry.activate(pad(1), pressed, noop());
        assert!(registry.update(
            pad(1),
            &RawSample {
                axes: Vec::new(),
                buttons: ButtonMask::single(2),
            }
        ));
        assert_eq!(events.borrow().as_slice(), &[(pad(1), 2)]);
        assert!(!registry.update(pad(2), &RawSample::default()));
    }

    #[test]
    fn test_rebind_callbacks() {
        let mut registry = quiet_registry();
        assert!(!registry.rebind_callbacks(pad(0), noop(), noop()));

        registry.activate(pad(0), noop(), noop());
        let count = Rc::new(RefCell::new(0));
        let pressed: ButtonCallback = {
            let count = Rc::clone(&count);
            Box::new(move |_, _| *count.borrow_mut() += 1)
        };
        assert!(registry.rebind_callbacks(pad(0), pressed, noop()));

        registry.update(
            pad(0),
            &RawSample {
                axes: Vec::new(),
                buttons: ButtonMask::single(0),
            },
        );
        assert_eq!(*count.borrow(), 1);
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_get_by_identity() {
        let mut registry = quiet_registry();
        registry.activate(pad(0), noop(), noop());

        assert!(registry.get_by_identity(pad(0)).is_some());
        assert!(registry.get_by_identity(pad(1)).is_none());
        assert!(registry
            .get_by_identity(ControllerIdentity::new(InputWrapper::Sdl, 0))
            .is_none());
    }

    #[test]
    fn test_get_by_adapter_uses_instance_identity() {
        let mut registry = quiet_registry();
        registry.activate(pad(0), noop(), noop());
        registry.activate(pad(1), noop(), noop());

        let bound = registry.get_by_identity(pad(1)).unwrap().adapter().unwrap();
        let found = registry.get_by_adapter(bound).unwrap();
        assert_eq!(found.identity(), pad(1));

        // Same wrapper and index, different instance
        let stranger = create_adapter(pad(1));
        assert!(registry.get_by_adapter(stranger.as_ref()).is_none());
    }

    #[test]
    fn test_get_by_adapter_mut() {
        let mut registry = quiet_registry();
        registry.activate(pad(0), noop(), noop());
        let stranger = create_adapter(pad(0));
        assert!(registry.get_by_adapter_mut(stranger.as_ref()).is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.controllers().len(), 0);
        assert!(format!("{:?}", registry).starts_with("Registry"));
    }

    // ==================== Hook Tests ====================

    #[test]
    fn test_post_deserialize_rejects_duplicates() {
        let mut registry = quiet_registry();
        registry.controllers.push(ControllerConfiguration::new(pad(0)));
        registry.controllers.push(ControllerConfiguration::new(pad(0)));

        let result = registry.on_post_deserialize();
        assert!(matches!(result, Err(FlyByWireError::DuplicateIdentity(id)) if id == pad(0)));
    }

    #[test]
    fn test_release_clears_snapshots() {
        let mut registry = quiet_registry();
        registry.activate(pad(0), noop(), noop());
        registry.on_pre_serialize().unwrap();
        assert!(registry.controllers()[0].has_persisted_calibration());

        registry.release_persisted();
        assert!(!registry.controllers()[0].has_persisted_calibration());
    }
}
