// SPDX-License-Identifier: MPL-2.0

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::CameraBackendType;
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::widget::{self, settings};

impl AppModel {
    /// Settings drawer with camera, action, behavior and appearance sections
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let sections: Vec<Element<'_, Message>> = vec![
            self.camera_section().into(),
            self.actions_section().into(),
            self.behavior_section().into(),
            self.appearance_section().into(),
            widget::text::caption(format!("Version {}", env!("GIT_VERSION")))
                .class(cosmic::theme::Text::Accent)
                .into(),
        ];

        let content: Element<'_, Message> = settings::view_column(sections).into();

        context_drawer::context_drawer(content, Message::ToggleContextPage(ContextPage::Settings))
            .title(fl!("settings"))
    }

    fn camera_section(&self) -> settings::Section<'_, Message> {
        let selected_camera =
            (!self.camera_dropdown_options.is_empty()).then_some(self.current_camera_index);
        let selected_backend = CameraBackendType::ALL
            .iter()
            .position(|b| *b == self.config.backend);

        settings::section()
            .title(fl!("camera"))
            .add(settings::item::builder(fl!("camera-device")).control(widget::dropdown(
                &self.camera_dropdown_options,
                selected_camera,
                Message::SelectCamera,
            )))
            .add(settings::item::builder(fl!("camera-backend")).control(widget::dropdown(
                &self.backend_dropdown_options,
                selected_backend,
                Message::SelectBackend,
            )))
            .add(
                settings::item::builder(fl!("mirror-preview"))
                    .toggler(self.config.mirror_preview, |_| Message::ToggleMirrorPreview),
            )
    }

    fn actions_section(&self) -> settings::Section<'_, Message> {
        settings::section()
            .title(fl!("actions"))
            .add(
                settings::item::builder(fl!("auto-open-urls"))
                    .toggler(self.config.auto_open_urls, |_| Message::ToggleAutoOpenUrls),
            )
            .add(
                settings::item::builder(fl!("auto-compose-email")).toggler(
                    self.config.auto_compose_email,
                    |_| Message::ToggleAutoComposeEmail,
                ),
            )
    }

    fn behavior_section(&self) -> settings::Section<'_, Message> {
        settings::section().title(fl!("behavior")).add(
            settings::item::builder(fl!("pause-when-unfocused")).toggler(
                self.config.pause_when_unfocused,
                |_| Message::TogglePauseWhenUnfocused,
            ),
        )
    }

    fn appearance_section(&self) -> settings::Section<'_, Message> {
        settings::section().title(fl!("appearance")).add(
            settings::item::builder(fl!("theme")).control(widget::dropdown(
                &self.theme_dropdown_options,
                Some(self.config.app_theme.index()),
                Message::SelectTheme,
            )),
        )
    }
}
