/// Lyrics used when the songwriter model fails for a reason other than the key.
pub const LYRICS_UNAVAILABLE: &str = "Lyrics could not be generated for this track.";

pub fn lyrics_prompt(theme: &str) -> String {
    format!(
        "You are a creative songwriter. Write a short song with lyrics based on the following theme: \"{theme}\". Include verse and chorus sections."
    )
}

/// Media prompt that only describes the style; the model never sees the lyrics.
pub fn style_prompt(theme: &str) -> String {
    format!(
        "An audio track of a song with vocals about \"{theme}\". The video can be a simple, static image or an abstract visualizer, but the main focus is high-quality audio with music and singing."
    )
}

/// Media prompt that pins the vocals to already generated lyrics.
pub fn vocal_prompt(theme: &str, lyrics: &str) -> String {
    format!(
        "An audio track of a song about \"{theme}\". The singer must perform exactly these lyrics, in order, and nothing else:\n\n{lyrics}\n\nThe video can be a simple, static image or an abstract visualizer, but the main focus is high-quality audio with music and clearly sung vocals."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocal_prompt_embeds_lyrics_verbatim() {
        let lyrics = "[Verse]\nRain on the window\n[Chorus]\nStay";
        let prompt = vocal_prompt("rainy lofi", lyrics);

        assert!(prompt.contains(lyrics));
        assert!(prompt.contains("\"rainy lofi\""));
    }

    #[test]
    fn style_prompt_does_not_mention_lyrics() {
        assert!(!style_prompt("synthwave").to_lowercase().contains("lyrics"));
    }
}
