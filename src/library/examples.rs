use super::track::Track;

/// Demonstration tracks shown until the first real generation.
pub fn example_tracks() -> Vec<Track> {
    vec![
        Track::example(
            "example1",
            "Chill lofi hip-hop beat for studying",
            "[Verse 1]\nRainy days and textbooks open\nLofi beat, my focus scopin'\nMind is calm, the vibes are flowin'\nYeah, this is how the knowledge gets goin'",
        ),
        Track::example(
            "example2",
            "Energetic 80s synthwave with neon grids",
            "[Chorus]\nNeon grids in the midnight hour\nSynthwave dreams, electric power\nRacing through a digital sky\nIn the 80s, we never say die!",
        ),
        Track::example(
            "example3",
            "Epic cinematic orchestra for a movie trailer",
            "(Epic orchestral swell)\nIn a world of shadow and light,\nA hero rises to the fight.\nDestiny calls, a fate unknown,\nHe will not face it all alone.\n(Full orchestra crescendo)",
        ),
    ]
}
