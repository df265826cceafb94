use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use splay_control_lib::control_interface::commands::{CommandType, ReservedCommand};
use splay_control_lib::control_interface::model::{
    CueSelector, Setting, TriggerCondition, UniverseType,
};
use splay_control_lib::control_interface::ControlInterface;
use splay_control_lib::util::config::{ClientConfig, DEFAULT_PORT};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.is_verbose() { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    handle_cli(cli).await
}

/// This struct defines the command line interface of the application
#[derive(Parser)]
#[clap(
    name = "splay_control",
    about = "Controls S-Play lighting playback devices",
    version = "0.1.0"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    fn is_verbose(&self) -> bool {
        matches!(self.command, Commands::DeviceCall { verbose: true, .. })
    }
}

/// Supported output formats for command results.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// Plain text format.
    Plaintext,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

/// Subcommands available for the CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Subcommand for operations that require device communication
    #[clap(name = "device-call")]
    DeviceCall {
        /// Sets the IP address or host name of the S-Play device
        #[clap(long)]
        host: String,

        /// Port of the device's WebSocket and HTTP API
        #[clap(long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Timeout in milliseconds, applied separately to the handshake and the request
        #[clap(short = 't', long = "timeout", default_value_t = 2000)]
        timeout: u64,

        /// Log every protocol step
        #[clap(short, long)]
        verbose: bool,

        /// Output format (plaintext, json, yaml)
        #[clap(short, long, value_enum, default_value_t = OutputFormat::Plaintext)]
        output: OutputFormat,

        #[clap(subcommand)]
        action: DeviceAction,
    },
    /// Lists the command codes the device understands
    #[clap(name = "catalog")]
    Catalog {
        /// Also list the codes that are reserved and never sent
        #[clap(long)]
        reserved: bool,
    },
}

/// DMX input used for capture and recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliUniverseType {
    Dmx,
    ArtNet,
    Sacn,
}

impl From<CliUniverseType> for UniverseType {
    fn from(universe_type: CliUniverseType) -> Self {
        match universe_type {
            CliUniverseType::Dmx => UniverseType::Dmx,
            CliUniverseType::ArtNet => UniverseType::ArtNet,
            CliUniverseType::Sacn => UniverseType::Sacn,
        }
    }
}

fn parse_setting(s: &str) -> Result<Setting, String> {
    let code = s
        .parse::<u8>()
        .map_err(|_| "could not parse setting id".to_string())?;
    Setting::try_from(code).map_err(|code| format!("unknown setting id {}", code))
}

/// Actions available under the `device-call` subcommand
#[derive(Subcommand)]
pub enum DeviceAction {
    /// Runs only the handshake and prints the session token.
    #[clap(name = "token")]
    Token,
    /// Gets the engine version.
    #[clap(name = "get-version")]
    GetVersion,
    /// Gets the network configuration.
    #[clap(name = "get-network")]
    GetNetwork,
    /// Sets the network configuration from a JSON file.
    #[clap(name = "set-network")]
    SetNetwork { file: PathBuf },
    /// Gets the system time.
    #[clap(name = "get-time")]
    GetTime,
    /// Sets the system time from a JSON file.
    #[clap(name = "set-time")]
    SetTime { file: PathBuf },
    /// Lists the available storages.
    #[clap(name = "get-storages")]
    GetStorages,
    /// Selects the storage to play from.
    #[clap(name = "set-storage")]
    SetStorage { storage: String },
    /// Reads one setting.
    #[clap(name = "get-setting")]
    GetSetting {
        /// Numeric setting id
        #[clap(value_parser = parse_setting)]
        setting: Setting,
    },
    /// Writes one setting from a JSON file holding `{"setting_id": .., "value": ..}`.
    #[clap(name = "update-setting")]
    UpdateSetting { file: PathBuf },
    /// Gets the master intensity.
    #[clap(name = "get-master-intensity")]
    GetMasterIntensity,
    /// Sets the master intensity.
    #[clap(name = "set-master-intensity")]
    SetMasterIntensity { intensity: i64 },

    /// Lists all playlists.
    #[clap(name = "get-all-playlists")]
    GetAllPlaylists,
    /// Gets one playlist with its timeline.
    #[clap(name = "get-playlist")]
    GetPlaylist { playlist_id: i64 },
    /// Creates or replaces a playlist from a JSON file.
    #[clap(name = "update-playlist")]
    UpdatePlaylist { file: PathBuf },
    /// Deletes a playlist.
    #[clap(name = "delete-playlist")]
    DeletePlaylist { playlist_id: i64 },
    /// Reorders playlists from a JSON file holding `[{"playlist_id": .., "order": ..}]`.
    #[clap(name = "update-playlists-order")]
    UpdatePlaylistsOrder { file: PathBuf },
    #[clap(name = "play")]
    Play { playlist_id: i64 },
    #[clap(name = "pause")]
    Pause { playlist_id: i64 },
    #[clap(name = "stop")]
    Stop { playlist_id: i64 },
    #[clap(name = "play-all")]
    PlayAll,
    #[clap(name = "pause-all")]
    PauseAll,
    #[clap(name = "stop-all")]
    StopAll,
    /// Sets the intensity of one playlist.
    #[clap(name = "set-playlist-intensity")]
    SetPlaylistIntensity { playlist_id: i64, intensity: i64 },
    /// Moves a playlist's playhead.
    #[clap(name = "set-playlist-position")]
    SetPlaylistPosition {
        playlist_id: i64,
        /// Position in milliseconds
        position: i64,
    },

    /// Lists all cues.
    #[clap(name = "get-all-cues")]
    GetAllCues,
    /// Gets one cue with its frames.
    #[clap(name = "get-cue")]
    GetCue { cue_id: i64 },
    /// Saves a cue from a JSON file.
    #[clap(name = "save-cue")]
    SaveCue { file: PathBuf },
    #[clap(name = "delete-cue")]
    DeleteCue { cue_id: i64 },
    #[clap(name = "duplicate-cue")]
    DuplicateCue { cue_id: i64 },
    /// Plays a stored cue, or an unsaved one read from a JSON file.
    #[clap(name = "play-cue")]
    PlayCue {
        #[clap(required_unless_present = "file")]
        cue_id: Option<i64>,

        /// JSON file with a complete cue to play without saving it
        #[clap(long, conflicts_with = "cue_id")]
        file: Option<PathBuf>,
    },
    #[clap(name = "pause-cue")]
    PauseCue { cue_id: i64 },
    #[clap(name = "stop-cue")]
    StopCue { cue_id: i64 },
    #[clap(name = "exit-cue-edit")]
    ExitCueEdit,
    /// Captures a single DMX frame into a cue.
    #[clap(name = "capture-dmx-frame")]
    CaptureDmxFrame {
        cue_id: i64,

        #[clap(long, value_enum)]
        universe_type: CliUniverseType,

        #[clap(long, use_value_delimiter = true)]
        universes: Vec<u16>,
    },
    /// Starts recording DMX into a cue.
    #[clap(name = "record-dmx-frame")]
    RecordDmxFrame {
        cue_id: i64,

        #[clap(long, value_enum)]
        universe_type: CliUniverseType,

        #[clap(long, use_value_delimiter = true)]
        universes: Vec<u16>,

        /// Pass the incoming levels through while recording
        #[clap(long)]
        live_preview: bool,

        /// Mark the cue as looping
        #[clap(long = "loop")]
        looped: bool,

        /// JSON file with the `{"type": .., "value": ..}` condition that starts recording
        #[clap(long)]
        trigger: Option<PathBuf>,
    },
    #[clap(name = "stop-record")]
    StopRecord,

    #[clap(name = "get-all-events")]
    GetAllEvents,
    #[clap(name = "get-event")]
    GetEvent { event_id: i64 },
    /// Creates or replaces an event from a JSON file.
    #[clap(name = "update-event")]
    UpdateEvent { file: PathBuf },
    #[clap(name = "delete-event")]
    DeleteEvent { event_id: i64 },
    /// Fires the event described in a JSON file.
    #[clap(name = "send-event")]
    SendEvent { file: PathBuf },

    #[clap(name = "get-all-triggers")]
    GetAllTriggers,
    #[clap(name = "get-trigger")]
    GetTrigger { trigger_id: i64 },
    /// Creates or replaces a trigger from a JSON file.
    #[clap(name = "update-trigger")]
    UpdateTrigger { file: PathBuf },
    #[clap(name = "delete-trigger")]
    DeleteTrigger { trigger_id: i64 },
    /// Arms the trigger described in a JSON file.
    #[clap(name = "wait-trigger")]
    WaitTrigger { file: PathBuf },
    /// Checks whether the armed trigger has fired.
    #[clap(name = "check-trigger")]
    CheckTrigger,

    #[clap(name = "get-all-interfaces")]
    GetAllInterfaces,
    #[clap(name = "get-interface")]
    GetInterface { interface_id: i64 },
    /// Creates or replaces a control page from a JSON file.
    #[clap(name = "update-interface")]
    UpdateInterface { file: PathBuf },
    #[clap(name = "delete-interface")]
    DeleteInterface { interface_id: i64 },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Prints `response` in the requested format. `plaintext` renders it for humans.
fn emit<T, F>(output: OutputFormat, response: &T, plaintext: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    match output {
        OutputFormat::Plaintext => plaintext(response),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(response)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(response)?;
            println!("{}", yaml);
        }
    }
    Ok(())
}

fn emit_debug<T: Serialize + Debug>(output: OutputFormat, response: &T) -> Result<()> {
    emit(output, response, |response| println!("{:#?}", response))
}

fn emit_done<T: Serialize>(output: OutputFormat, response: &T, message: &str) -> Result<()> {
    emit(output, response, |_| println!("{}", message))
}

async fn handle_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Catalog { reserved } => {
            for command in CommandType::ALL {
                println!("{:>3}  {:?}", command.code(), command);
            }
            if reserved {
                println!("Reserved:");
                for command in ReservedCommand::ALL {
                    println!("{:>3}  {:?}", command.code(), command);
                }
            }
        }
        Commands::DeviceCall {
            host,
            port,
            timeout,
            verbose,
            output,
            action,
        } => {
            let config = ClientConfig::new(&host)
                .with_port(port)
                .with_timeout(Duration::from_millis(timeout))
                .with_verbose(verbose);
            debug!(
                "Calling {}:{} with a {} ms timeout per phase",
                host, port, timeout
            );
            let control = ControlInterface::with_config(config);

            run_action(&control, action, output)
                .await
                .with_context(|| format!("Device call to {} failed", host))?;
        }
    }

    Ok(())
}

async fn run_action(control: &ControlInterface, action: DeviceAction, output: OutputFormat) -> Result<()> {
    match action {
        DeviceAction::Token => {
            let token = control.acquire_token().await?;
            emit(output, &token, |token| println!("{}", token))?;
        }
        DeviceAction::GetVersion => {
            let response = control.get_version().await?;
            emit(output, &response, |r| println!("Version: {}", r.version))?;
        }
        DeviceAction::GetNetwork => {
            let response = control.get_network().await?;
            emit(output, &response, |r| {
                let network = &r.network;
                println!("IP: {}", network.ip);
                println!("Mask: {}", network.mask);
                println!("Gateway: {}", network.gateway);
                println!("MAC: {}", network.mac);
                println!("DHCP: {}", network.dhcp);
            })?;
        }
        DeviceAction::SetNetwork { file } => {
            let response = control.set_network(read_json(&file)?).await?;
            emit_done(output, &response, "Network configuration updated.")?;
        }
        DeviceAction::GetTime => {
            let response = control.get_time().await?;
            emit(output, &response, |r| println!("Time: {}", r.time))?;
        }
        DeviceAction::SetTime { file } => {
            let response = control.set_time(read_json(&file)?).await?;
            emit_done(output, &response, "System time updated.")?;
        }
        DeviceAction::GetStorages => {
            let response = control.get_storages().await?;
            emit(output, &response, |r| {
                for storage in &r.storages.available {
                    let marker = if storage.storage == r.storages.selected {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{} {} ({} free of {})",
                        marker, storage.storage, storage.free, storage.total
                    );
                }
            })?;
        }
        DeviceAction::SetStorage { storage } => {
            let response = control.set_storage(&storage).await?;
            emit_done(output, &response, &format!("Storage set to {}.", storage))?;
        }
        DeviceAction::GetSetting { setting } => {
            let response = control.get_setting(setting).await?;
            emit(output, &response, |r| println!("{:?}: {}", setting, r.setting))?;
        }
        DeviceAction::UpdateSetting { file } => {
            let response = control.update_setting(read_json(&file)?).await?;
            emit_done(output, &response, "Setting updated.")?;
        }
        DeviceAction::GetMasterIntensity => {
            let response = control.get_master_intensity().await?;
            emit(output, &response, |r| {
                println!("Master intensity: {}", r.intensity)
            })?;
        }
        DeviceAction::SetMasterIntensity { intensity } => {
            let response = control.set_master_intensity(intensity).await?;
            emit_done(
                output,
                &response,
                &format!("Master intensity set to {}.", intensity),
            )?;
        }

        DeviceAction::GetAllPlaylists => {
            let response = control.get_all_playlists().await?;
            emit(output, &response, |r| {
                for playlist in &r.playlists {
                    println!(
                        "ID: {}, Name: {}, Status: {:?}",
                        playlist.playlist_id, playlist.name, playlist.status
                    );
                }
            })?;
        }
        DeviceAction::GetPlaylist { playlist_id } => {
            let response = control.get_playlist(playlist_id).await?;
            emit_debug(output, &response)?;
        }
        DeviceAction::UpdatePlaylist { file } => {
            let playlist = control.update_playlist(read_json(&file)?).await?;
            emit(output, &playlist, |p| {
                println!("Playlist saved: {:?} {}", p.playlist_id, p.name)
            })?;
        }
        DeviceAction::DeletePlaylist { playlist_id } => {
            let response = control.delete_playlist(playlist_id).await?;
            emit_done(
                output,
                &response,
                &format!("Playlist {} deleted.", playlist_id),
            )?;
        }
        DeviceAction::UpdatePlaylistsOrder { file } => {
            let response = control.update_playlists_order(read_json(&file)?).await?;
            emit_done(output, &response, "Playlist order updated.")?;
        }
        DeviceAction::Play { playlist_id } => {
            let response = control.play(playlist_id).await?;
            emit_done(output, &response, &format!("Playing playlist {}.", playlist_id))?;
        }
        DeviceAction::Pause { playlist_id } => {
            let response = control.pause(playlist_id).await?;
            emit_done(output, &response, &format!("Paused playlist {}.", playlist_id))?;
        }
        DeviceAction::Stop { playlist_id } => {
            let response = control.stop(playlist_id).await?;
            emit_done(output, &response, &format!("Stopped playlist {}.", playlist_id))?;
        }
        DeviceAction::PlayAll => {
            let response = control.play_all_playlists().await?;
            emit_done(output, &response, "Playing all playlists.")?;
        }
        DeviceAction::PauseAll => {
            let response = control.pause_all_playlists().await?;
            emit_done(output, &response, "Paused all playlists.")?;
        }
        DeviceAction::StopAll => {
            let response = control.stop_all_playlists().await?;
            emit_done(output, &response, "Stopped all playlists.")?;
        }
        DeviceAction::SetPlaylistIntensity {
            playlist_id,
            intensity,
        } => {
            let response = control
                .set_playlist_intensity(playlist_id, intensity)
                .await?;
            emit_done(
                output,
                &response,
                &format!("Playlist {} intensity set to {}.", playlist_id, intensity),
            )?;
        }
        DeviceAction::SetPlaylistPosition {
            playlist_id,
            position,
        } => {
            let response = control
                .set_playlist_time_position(playlist_id, position)
                .await?;
            emit_done(
                output,
                &response,
                &format!("Playlist {} moved to {} ms.", playlist_id, position),
            )?;
        }

        DeviceAction::GetAllCues => {
            let response = control.get_all_cues().await?;
            emit(output, &response, |r| {
                for cue in &r.cues {
                    println!(
                        "ID: {}, Name: {}, Type: {:?}, Duration: {} ms",
                        cue.cue_id, cue.name, cue.cue_type, cue.duration
                    );
                }
            })?;
        }
        DeviceAction::GetCue { cue_id } => {
            let response = control.get_cue(cue_id).await?;
            emit_debug(output, &response)?;
        }
        DeviceAction::SaveCue { file } => {
            let response = control.save_cue(read_json(&file)?).await?;
            emit(output, &response, |r| {
                println!("Cue saved: {} {}", r.cue.cue_id, r.cue.name)
            })?;
        }
        DeviceAction::DeleteCue { cue_id } => {
            let response = control.delete_cue(cue_id).await?;
            emit_done(output, &response, &format!("Cue {} deleted.", cue_id))?;
        }
        DeviceAction::DuplicateCue { cue_id } => {
            let response = control.duplicate_cue(cue_id).await?;
            emit(output, &response, |r| {
                println!("Cue {} duplicated as {}.", cue_id, r.cue.cue_id)
            })?;
        }
        DeviceAction::PlayCue { cue_id, file } => {
            let selector = match (cue_id, file) {
                (Some(cue_id), None) => CueSelector::stored(cue_id),
                (None, Some(file)) => CueSelector::inline(read_json(&file)?),
                _ => return Err(anyhow!("Give either a cue id or a cue file")),
            };
            let response = control.play_cue(selector).await?;
            emit_done(output, &response, "Cue playing.")?;
        }
        DeviceAction::PauseCue { cue_id } => {
            let response = control.pause_cue(cue_id).await?;
            emit_done(output, &response, &format!("Paused cue {}.", cue_id))?;
        }
        DeviceAction::StopCue { cue_id } => {
            let response = control.stop_cue(cue_id).await?;
            emit_done(output, &response, &format!("Stopped cue {}.", cue_id))?;
        }
        DeviceAction::ExitCueEdit => {
            let response = control.exit_cue_edit().await?;
            emit_done(output, &response, "Left cue edit.")?;
        }
        DeviceAction::CaptureDmxFrame {
            cue_id,
            universe_type,
            universes,
        } => {
            let response = control
                .capture_dmx_frame(cue_id, universe_type.into(), universes)
                .await?;
            emit_done(output, &response, &format!("Frame captured into cue {}.", cue_id))?;
        }
        DeviceAction::RecordDmxFrame {
            cue_id,
            universe_type,
            universes,
            live_preview,
            looped,
            trigger,
        } => {
            let trigger = match trigger {
                Some(file) => read_json(&file)?,
                None => TriggerCondition::None,
            };
            let response = control
                .record_dmx_frame(
                    cue_id,
                    live_preview,
                    looped,
                    trigger,
                    universe_type.into(),
                    universes,
                )
                .await?;
            emit_done(output, &response, &format!("Recording into cue {}.", cue_id))?;
        }
        DeviceAction::StopRecord => {
            let response = control.stop_record().await?;
            emit_done(output, &response, "Recording stopped.")?;
        }

        DeviceAction::GetAllEvents => {
            let response = control.get_all_events().await?;
            emit(output, &response, |r| {
                for event in &r.events {
                    println!(
                        "ID: {}, Name: {}, Type: {:?}",
                        event.event_id,
                        event.name,
                        event.action.event_type()
                    );
                }
            })?;
        }
        DeviceAction::GetEvent { event_id } => {
            let response = control.get_event(event_id).await?;
            emit_debug(output, &response)?;
        }
        DeviceAction::UpdateEvent { file } => {
            let response = control.update_event(read_json(&file)?).await?;
            emit(output, &response, |r| {
                println!("Event saved: {} {}", r.event.event_id, r.event.name)
            })?;
        }
        DeviceAction::DeleteEvent { event_id } => {
            let response = control.delete_event(event_id).await?;
            emit_done(output, &response, &format!("Event {} deleted.", event_id))?;
        }
        DeviceAction::SendEvent { file } => {
            let response = control.send_event(read_json(&file)?).await?;
            emit_done(output, &response, "Event sent.")?;
        }

        DeviceAction::GetAllTriggers => {
            let response = control.get_all_triggers().await?;
            emit(output, &response, |r| {
                for trigger in &r.triggers {
                    println!(
                        "ID: {}, Name: {}, Type: {:?}",
                        trigger.trigger_id,
                        trigger.name,
                        trigger.condition.trigger_type()
                    );
                }
            })?;
        }
        DeviceAction::GetTrigger { trigger_id } => {
            let response = control.get_trigger(trigger_id).await?;
            emit_debug(output, &response)?;
        }
        DeviceAction::UpdateTrigger { file } => {
            let response = control.update_trigger(read_json(&file)?).await?;
            emit(output, &response, |r| {
                println!("Trigger saved: {} {}", r.trigger.trigger_id, r.trigger.name)
            })?;
        }
        DeviceAction::DeleteTrigger { trigger_id } => {
            let response = control.delete_trigger(trigger_id).await?;
            emit_done(output, &response, &format!("Trigger {} deleted.", trigger_id))?;
        }
        DeviceAction::WaitTrigger { file } => {
            let response = control.wait_trigger(read_json(&file)?).await?;
            emit_done(output, &response, "Trigger armed.")?;
        }
        DeviceAction::CheckTrigger => {
            let response = control.check_trigger().await?;
            emit_done(output, &response, "Trigger fired.")?;
        }

        DeviceAction::GetAllInterfaces => {
            let response = control.get_all_interfaces().await?;
            emit(output, &response, |r| {
                for interface in &r.interfaces {
                    println!(
                        "ID: {}, Name: {}, URL: {}",
                        interface.interface_id, interface.name, interface.url
                    );
                }
            })?;
        }
        DeviceAction::GetInterface { interface_id } => {
            let response = control.get_interface(interface_id).await?;
            emit_debug(output, &response)?;
        }
        DeviceAction::UpdateInterface { file } => {
            let response = control.update_interface(read_json(&file)?).await?;
            emit(output, &response, |r| {
                println!(
                    "Interface saved: {} {}",
                    r.interface.interface_id, r.interface.name
                )
            })?;
        }
        DeviceAction::DeleteInterface { interface_id } => {
            let response = control.delete_interface(interface_id).await?;
            emit_done(
                output,
                &response,
                &format!("Interface {} deleted.", interface_id),
            )?;
        }
    }

    Ok(())
}
