//! Access to the one dialog dock of the UI thread
//!
//! The dock is created lazily on first access and lives until the thread
//! exits. The UI runs on a single thread, so the dock is shared as
//! `Rc<RefCell<_>>` from thread-local storage.

use super::{
    host::{DockContainer, SlotContainer},
    manager::DialogDock,
    types::{DockError, DockResult},
};
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;
use tracing::debug;

type ContainerFactory = Box<dyn FnOnce() -> Box<dyn DockContainer>>;

thread_local! {
    static CONTAINER_FACTORY: RefCell<Option<ContainerFactory>> = RefCell::new(None);
    static MAIN_WIN_DOCK: OnceCell<Rc<RefCell<DialogDock>>> = OnceCell::new();
}

/// The dialog dock.
///
/// The first call creates the dock, using the container from
/// [`install_container_factory`] or a [`SlotContainer`] if none was
/// installed. Every later call returns the same instance.
pub fn dock() -> Rc<RefCell<DialogDock>> {
    MAIN_WIN_DOCK.with(|cell| {
        cell.get_or_init(|| {
            let container = CONTAINER_FACTORY
                .with(|factory| factory.borrow_mut().take())
                .map(|factory| factory())
                .unwrap_or_else(|| {
                    debug!("No container factory installed, using an in-memory slot");
                    Box::new(SlotContainer::default()) as Box<dyn DockContainer>
                });
            Rc::new(RefCell::new(DialogDock::new(container)))
        })
        .clone()
    })
}

/// Supply the container the dock will be created with.
///
/// Must be called before the first [`dock()`] call.
pub fn install_container_factory<F>(factory: F) -> DockResult<()>
where
    F: FnOnce() -> Box<dyn DockContainer> + 'static,
{
    if is_initialized() {
        return Err(DockError::AlreadyInitialized);
    }

    CONTAINER_FACTORY.with(|slot| *slot.borrow_mut() = Some(Box::new(factory)));
    Ok(())
}

/// Whether the dock has been created yet
pub fn is_initialized() -> bool {
    MAIN_WIN_DOCK.with(|cell| cell.get().is_some())
}
