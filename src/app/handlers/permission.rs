// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission handlers

use crate::app::state::{AppModel, Message};
use crate::fl;
use crate::permission::{self, PermissionState};
use cosmic::Task;
use tracing::info;

impl AppModel {
    pub(crate) fn handle_request_permission(&mut self) -> Task<cosmic::Action<Message>> {
        if self.permission == PermissionState::Requesting {
            return Task::none();
        }
        info!("Requesting camera permission");
        self.permission = PermissionState::Requesting;
        Task::perform(permission::request_camera_access(), |state| {
            cosmic::Action::App(Message::PermissionResolved(state))
        })
    }

    pub(crate) fn handle_permission_resolved(
        &mut self,
        state: PermissionState,
    ) -> Task<cosmic::Action<Message>> {
        self.permission = state;
        match state {
            PermissionState::Granted => {
                info!("Camera access granted");
                self.enumerate_cameras_task()
            }
            PermissionState::Denied => {
                self.available_cameras.clear();
                self.camera_dropdown_options.clear();
                self.current_frame = None;
                self.preview = None;
                self.show_toast(fl!("permission-denied"))
            }
            PermissionState::Unknown | PermissionState::Requesting => Task::none(),
        }
    }
}
