use std::sync::Arc;

use crate::rooms::RoomRegistry;

#[derive(Clone)]
pub struct AppState {
    // All rooms live behind the registry; handlers only ever hold handles.
    pub rooms: Arc<RoomRegistry>,
}
