use std::time::Duration;

use anyhow::Result;
use tracing::info;
use uinput::device::Device;
use uinput::event::keyboard;

use super::MediaCommand;

/// Virtual keyboard sink: taps the VLC default hotkey for each
/// command through a /dev/uinput device.
pub struct KeyboardSink {
    dev: Device,
}

impl KeyboardSink {
    pub fn new() -> Result<Self> {
        let dev = uinput::default()
            .map_err(|e| anyhow::anyhow!("Failed to open /dev/uinput: {:?}", e))?
            .name("wavectl-virtual-keyboard")
            .map_err(|e| anyhow::anyhow!("Failed to name uinput device: {:?}", e))?
            .event(uinput::event::Keyboard::All)
            .map_err(|e| anyhow::anyhow!("Failed to enable keyboard events: {:?}", e))?
            .create()
            .map_err(|e| anyhow::anyhow!("Failed to create uinput device: {:?}", e))?;

        info!("Virtual keyboard created");
        Ok(Self { dev })
    }

    fn key_for(command: MediaCommand) -> keyboard::Key {
        match command {
            MediaCommand::PlayPause => keyboard::Key::Space,
            MediaCommand::VolumeUp => keyboard::Key::Up,
            MediaCommand::VolumeDown => keyboard::Key::Down,
            MediaCommand::SeekBack => keyboard::Key::Left,
            MediaCommand::SeekForward => keyboard::Key::Right,
            MediaCommand::Mute => keyboard::Key::M,
            MediaCommand::NextTrack => keyboard::Key::N,
            MediaCommand::PrevTrack => keyboard::Key::P,
            MediaCommand::SystemOff => keyboard::Key::Grave,
        }
    }

    pub fn send(&mut self, command: MediaCommand) -> Result<()> {
        let key = Self::key_for(command);
        self.dev
            .press(&keyboard::Keyboard::Key(key))
            .map_err(|e| anyhow::anyhow!("Key press failed: {:?}", e))?;
        self.sync()?;
        std::thread::sleep(Duration::from_millis(10));
        self.dev
            .release(&keyboard::Keyboard::Key(key))
            .map_err(|e| anyhow::anyhow!("Key release failed: {:?}", e))?;
        self.sync()
    }

    fn sync(&mut self) -> Result<()> {
        self.dev
            .synchronize()
            .map_err(|e| anyhow::anyhow!("uinput sync failed: {:?}", e))
    }
}
