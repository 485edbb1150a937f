//! Fixed encoding profile shared by silence segments and the output.

use crate::config::OutputSettings;

/// Codec parameters every generated file is encoded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputProfile {
    pub codec: String,
    pub bitrate: String,
    pub sample_rate: u32,
    pub channels: u32,
    pub extension: String,
}

impl Default for OutputProfile {
    fn default() -> Self {
        Self::from_settings(&OutputSettings::default())
    }
}

impl OutputProfile {
    pub fn from_settings(settings: &OutputSettings) -> Self {
        Self {
            codec: settings.codec.clone(),
            bitrate: settings.bitrate.clone(),
            sample_rate: settings.sample_rate,
            channels: settings.channels,
            extension: settings.extension.trim_start_matches('.').to_string(),
        }
    }

    /// Channel layout name understood by `anullsrc`.
    pub fn channel_layout(&self) -> String {
        match self.channels {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{}c", n),
        }
    }

    /// `-c:a .. -b:a .. -ar .. -ac ..`
    pub fn encode_args(&self) -> Vec<String> {
        let mut args = vec!["-c:a".to_string(), self.codec.clone()];
        if !self.bitrate.trim().is_empty() {
            args.push("-b:a".to_string());
            args.push(self.bitrate.clone());
        }
        args.extend([
            "-ar".to_string(),
            self.sample_rate.to_string(),
            "-ac".to_string(),
            self.channels.to_string(),
        ]);
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_stereo_mp3() {
        let profile = OutputProfile::default();
        assert_eq!(profile.channel_layout(), "stereo");
        assert_eq!(
            profile.encode_args(),
            vec!["-c:a", "libmp3lame", "-b:a", "192k", "-ar", "44100", "-ac", "2"]
        );
    }

    #[test]
    fn layout_and_empty_bitrate() {
        let settings = OutputSettings {
            codec: "pcm_s16le".to_string(),
            bitrate: String::new(),
            channels: 1,
            extension: ".wav".to_string(),
            ..OutputSettings::default()
        };
        let profile = OutputProfile::from_settings(&settings);
        assert_eq!(profile.channel_layout(), "mono");
        assert_eq!(profile.extension, "wav");
        assert!(!profile.encode_args().contains(&"-b:a".to_string()));

        let surround = OutputProfile {
            channels: 6,
            ..profile
        };
        assert_eq!(surround.channel_layout(), "6c");
    }
}
