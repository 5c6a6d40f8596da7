mod app;
mod config;
mod data;
mod error;
mod processing;
mod render;
mod state;
mod ui;

use app::ShotChartApp;
use clap::Parser;
use config::{AppConfig, CliArgs};
use eframe::egui;
use eframe::egui_wgpu;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = CliArgs::parse();
    let config = match AppConfig::resolve(args.config_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}; using default settings");
            AppConfig::default()
        }
    };
    let title = config.title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([760.0, 1000.0])
            .with_min_inner_size([560.0, 600.0])
            .with_drag_and_drop(true),
        wgpu_options: egui_wgpu::WgpuConfiguration {
            present_mode: eframe::wgpu::PresentMode::AutoVsync,
            wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
                instance_descriptor: eframe::wgpu::InstanceDescriptor {
                    backends: eframe::wgpu::Backends::DX12
                        | eframe::wgpu::Backends::VULKAN
                        | eframe::wgpu::Backends::METAL
                        | eframe::wgpu::Backends::GL,
                    ..Default::default()
                },
                power_preference: eframe::wgpu::PowerPreference::LowPower,
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(ShotChartApp::new(cc, config, args.data_file)))),
    )
}
