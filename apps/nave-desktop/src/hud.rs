use egui::Context as EguiContext;
use nave_kernel::Session;
use nave_render::FrameTimer;

/// Loading progress while the gate is closed, then a small status corner.
pub fn draw(ctx: &EguiContext, session: &Session, timer: &FrameTimer) {
    let summary = session.summary();

    if !summary.ready {
        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.4);
                    ui.heading("Loading");
                    let progress = if summary.begun == 0 {
                        0.0
                    } else {
                        summary.completed as f32 / summary.begun as f32
                    };
                    ui.add(
                        egui::ProgressBar::new(progress)
                            .desired_width(320.0)
                            .text(format!("{}/{}", summary.completed, summary.begun)),
                    );
                    if let Some(failure) = session.load_failure() {
                        ui.colored_label(egui::Color32::LIGHT_RED, failure.to_string());
                    } else {
                        let pending = session.pending_assets();
                        if !pending.is_empty() {
                            ui.small(pending.join(", "));
                        }
                    }
                });
            });
        return;
    }

    egui::Area::new(egui::Id::new("status"))
        .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
        .show(ctx, |ui| {
            let [x, y, z] = summary.position;
            ui.label(format!("{:.0} fps", timer.fps()));
            ui.label(format!("pos ({x:.2}, {y:.2}, {z:.2})"));
            ui.label(format!(
                "colliders {}{}",
                summary.colliders,
                if session.colliders_visible() { " (shown)" } else { "" }
            ));
            if !session.pointer_captured() {
                ui.small("Click to look around. WASD to walk, E shows colliders, Esc releases.");
            }
        });
}
