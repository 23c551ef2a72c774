//! ASCII-art animation of the pet.

pub mod live;

use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::pet::Mood;

pub use live::run_loop;

/// Clear the screen and move the cursor home.
pub const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// How many frames one rendering pass shows, cycling through the set.
pub const FRAMES_PER_PASS: usize = 4;

const HAPPY: &[&str] = &[
    "\n ∧＿∧\n ( ◕‿◕)    ♥\n /つ🍪⊂\\\n しーーーJ\n",
    "\n ∧＿∧\n ( ◕‿◕)    ♥\n /つ  ⊂\\\n しーーーJ\n",
];

const SAD: &[&str] = &["\n ∧＿∧\n ( ；‿；)    ☁\n /つ   ⊂\\\n しーーーJ\n"];

const SCARED: &[&str] = &[
    "\n ∧＿∧\n ( ⊙﹏⊙)    !!\n /つ   ⊂\\\n しーーーJ\n",
    "\n  ∧＿∧\n ( ⊙﹏⊙)   !!\n /つ   ⊂\\\n しーーーJ\n",
];

const SLEEPING: &[&str] = &[
    "\n ∧＿∧\n ( －‿－)    z\n /つ   ⊂\\\n しーーーJ\n",
    "\n ∧＿∧\n ( －‿－)    zZ\n /つ   ⊂\\\n しーーーJ\n",
];

const NEUTRAL: &[&str] = &["\n ∧＿∧\n ( ◕‿◕)\n /つ   ⊂\\\n しーーーJ\n"];

pub const EXIT_FRAMES: &[&str] = &[
    "\n ∧＿∧\n ( ◡‿◡)    Bye\n /つ   ⊂\\\n しーーーJ\n",
    "\n  ∧＿∧\n ( ；_；)    Bye\n /つ   ⊂\\\n しーーーJ\n",
];

/// Animation frames for a mood.
pub fn frames(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => HAPPY,
        Mood::Sad => SAD,
        Mood::Scared => SCARED,
        Mood::Sleeping => SLEEPING,
        Mood::Neutral => NEUTRAL,
    }
}

/// Play `frames` for one pass, clearing the screen before each frame.
pub fn play<W: Write>(out: &mut W, frames: &[&str], delay: Duration) -> std::io::Result<()> {
    for frame in frames.iter().cycle().take(FRAMES_PER_PASS) {
        write!(out, "{}", CLEAR_SCREEN)?;
        writeln!(out, "{}", frame)?;
        out.flush()?;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    Ok(())
}

pub fn render_once<W: Write>(out: &mut W, mood: Mood, delay: Duration) -> std::io::Result<()> {
    play(out, frames(mood), delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mood_has_frames() {
        for mood in [
            Mood::Happy,
            Mood::Neutral,
            Mood::Sad,
            Mood::Sleeping,
            Mood::Scared,
        ] {
            assert!(!frames(mood).is_empty(), "{mood} has no frames");
        }
    }

    #[test]
    fn render_once_cycles_four_frames() {
        let mut out = Vec::new();
        render_once(&mut out, Mood::Happy, Duration::ZERO).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(CLEAR_SCREEN).count(), FRAMES_PER_PASS);
        assert_eq!(text.matches('🍪').count(), 2);
    }

    #[test]
    fn sad_pet_shows_cloud() {
        let mut out = Vec::new();
        render_once(&mut out, Mood::Sad, Duration::ZERO).unwrap();
        assert!(String::from_utf8(out).unwrap().contains('☁'));
    }
}
