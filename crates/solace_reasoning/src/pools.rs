//! Fixed reply texts used when no generative backend answers.
//!
//! Per-category pools fall back to `General` for categories without their own
//! lines. Nothing here carries a crisis number except the crisis scripts.

use rand::seq::SliceRandom;
use rand::Rng;
use solace_core::engagement::DryReplyTier;
use solace_core::Category;

pub type Pool = &'static [&'static str];

/// Uniform pick from `pool`, or `fallback` if the pool is empty.
pub fn pick<R: Rng + ?Sized>(pool: Pool, rng: &mut R, fallback: &'static str) -> &'static str {
    pool.choose(rng).copied().unwrap_or(fallback)
}

// ============================================================================
// Crisis
// ============================================================================

pub const CRISIS_SCRIPT: &str = "I'm really concerned about you. Your life matters. Please get help right now:

📞 Call or text 988 (Suicide & Crisis Lifeline)
💬 Text HOME to 741741 (Crisis Text Line)
🚨 Call 911 if you're in immediate danger

They're available 24/7. They care. They can help you through this.

Please reach out now.";

pub const CRISIS_REINFORCEMENT: Pool = &[
    "Please call 988 right now. Or text HOME to 741741. They can help you. Your life matters.",
    "I need you to reach out immediately. Call 988 or text 741741. They're waiting to help you.",
    "Please contact 988 now, call or text. They're trained to help. You don't have to face this alone.",
    "Call 988 or text HOME to 741741 right now. They can provide the support you need immediately.",
];

pub const MEDIUM_SUPPORT: &str = "What you're feeling sounds really heavy. I want you to know that help is available, and things can get better.

📞 Talk to someone now:
- 988 Suicide & Crisis Lifeline (24/7)
- Crisis Text Line: text HOME to 741741
- SAMHSA National Helpline: 1-800-662-4357

These feelings are temporary, even when they don't feel that way. Please reach out. You deserve support.";

// ============================================================================
// Fixed lines
// ============================================================================

pub const GREETING_REPLY: &str = "Hey there. What's on your mind?";

pub const AFFIRMATION_REPLY: &str =
    "That's good to hear. Anything you want to talk about, or just checking in?";

pub const CAPABILITIES_REPLY: &str = "I'm here to listen and support you emotionally. If something's weighing on you, I'm here to help you work through it.";

pub const HOW_ARE_YOU_REPLY: &str = "I'm here for you. More importantly, how are you doing?";

/// Last resort when a pool is unexpectedly empty.
pub const FALLBACK_REPLY: &str = "I'm here. What's on your mind?";

// ============================================================================
// Flat pools
// ============================================================================

pub const CONTEXT_QUESTIONS: Pool = &[
    "I hear you. What's been happening that's making you feel this way?",
    "That sounds tough. What's going on that brought this on?",
    "I'm listening. Can you tell me more about what's been happening?",
    "What's been going on? I'm here to listen.",
    "Tell me more. What happened that's making you feel like this?",
    "I'm here. What's been weighing on you?",
];

pub const CLARIFY: Pool = &[
    "I'm asking what's been going through your head lately. Anything you want to talk about?",
    "Just checking in. Is there something on your mind you'd like to share?",
    "I mean, what's been bothering you or what are you thinking about?",
    "Anything weighing on you? I'm here to listen.",
];

pub const LISTENING: Pool = &[
    "I'm listening. Go ahead.",
    "I'm here. Tell me everything.",
    "I hear you. What's going on?",
    "I'm all ears. What do you need to say?",
    "Tell me. I'm listening.",
];

pub const HEARTBREAK: Pool = &[
    "That heartbreak is real and raw. Losing someone you cared about deeply hurts in a way that's hard to describe. The pain you're feeling shows how much it mattered. It's okay to grieve this loss.",
    "Being dumped or going through a breakup cuts deep. You're dealing with loss, rejection, and the end of something that was important to you. The sadness, the hurt, maybe even anger: all of it is valid.",
    "Heartbreak is one of the hardest emotional pains. You're not just losing a person, but also the future you imagined together. That grief is real. Give yourself permission to feel it.",
    "That kind of rejection and loss hits hard. Your heart is processing a real wound right now. The sadness and the emptiness are part of healing, even though it doesn't feel like it yet.",
];

pub fn dry_reply(tier: DryReplyTier) -> Pool {
    match tier {
        DryReplyTier::None => &[],
        DryReplyTier::SoftAcknowledge => &[
            "I'm here with you.",
            "Sounds like a quiet moment.",
            "I hear you.",
            "Okay. I'm listening.",
            "Alright. Take your time.",
            "No rush.",
        ],
        DryReplyTier::LightProbe => &[
            "Feels more like tired 💤 or blank 🌫️?",
            "Is it a quiet kind of day or a heavy one?",
            "Sounds like something's sitting on your mind… even if it's hard to put into words.",
            "Is this more mentally tired or emotionally flat?",
            "Feels like your energy is low. What's weighing on you?",
            "Sometimes 'okay' means holding things together. Want to talk about it?",
        ],
        DryReplyTier::GentleVariety => &[
            "If today had a color, grey ☁️, blue 🌊, or black 🖤, which fits?",
            "Feels like your mind is foggy or just still?",
            "Want something light? 🌫️ a vibe check, 🎧 a calm moment, or just company?",
            "Is this a slow day or a heavy day?",
            "Blank moments happen. What does today feel like?",
            "Sometimes quiet means peace, sometimes storm. Which is it?",
        ],
        DryReplyTier::RespectSilence => &[
            "Okay. I'm right here. No pressure to talk.",
            "We can sit in the quiet if you want.",
            "Alright. I'll stay with you.",
            "No worries. I'm here whenever you're ready.",
            "That's okay. Sometimes silence is enough.",
            "I'm here. Just let me know if you need anything.",
        ],
    }
}

// ============================================================================
// Per-category pools
// ============================================================================

pub fn question_answers(category: Category) -> Pool {
    match category {
        Category::Anxiety => &[
            "Try grounding yourself. Focus on what you can control right now.",
            "One step at a time. What feels most urgent?",
        ],
        Category::Stress => &[
            "Start with one thing. What's the biggest pressure point?",
            "Break it down. What's the first small step?",
        ],
        Category::Depression => &[
            "Small steps matter. What feels doable today?",
            "Be gentle with yourself. What would help right now?",
        ],
        _ => &[
            "Tell me more about what's going on.",
            "I'm listening. What's happening with you?",
            "What would you like to talk about?",
        ],
    }
}

pub fn analysis(category: Category) -> Pool {
    match category {
        Category::Anxiety => &[
            "It sounds like that situation is triggering anxiety because of the uncertainty and pressure. That's a completely natural response. Your mind is trying to prepare for what might happen, which can feel overwhelming.",
            "What you're describing makes sense. Anxiety often comes up when we're facing something important or unpredictable. Your body is responding to a perceived threat, even if it's not physical danger.",
            "That kind of situation would make anyone anxious. Your nervous system is reacting to the stress and unknowns. It's your mind's way of trying to protect you, even though it feels uncomfortable.",
        ],
        Category::Depression => &[
            "It sounds like you're carrying a heavy emotional weight from what's been happening. Depression often shows up when we're dealing with loss, disappointment, or prolonged stress. What you're feeling is real and valid.",
            "That heaviness makes sense given what you're going through. Depression can drain our energy and make everything feel harder. It's not weakness. It's your mind and body responding to difficult circumstances.",
            "What you're describing sounds like depression settling in from the accumulated stress and pain. It's understandable that you'd feel this way after what you've been dealing with.",
        ],
        Category::Stress => &[
            "That's a lot of pressure to be under. Stress builds up when we're juggling multiple demands without enough relief. Your body and mind are signaling that you need some support or a break.",
            "It makes sense you're feeling stressed. That's a natural response to having so much on your plate. Your system is in overdrive trying to manage everything at once.",
            "What you're describing is classic stress overload. When demands exceed our resources, our body goes into high alert. That tension you're feeling is your system trying to cope.",
        ],
        Category::Loneliness => &[
            "That isolation sounds really painful. Loneliness often comes from feeling disconnected or misunderstood, even when people are around. What you're experiencing is a real emotional need for connection.",
            "It makes sense you'd feel lonely in that situation. Humans need meaningful connection, and when that's missing, it creates a deep ache. Your feelings are valid.",
            "That kind of disconnection is hard. Loneliness isn't just about being alone. It's about not feeling seen or understood. What you're feeling is a natural response to that gap.",
        ],
        Category::Burnout => &[
            "That exhaustion sounds like burnout, when you've been pushing hard for too long without enough recovery. Your mind and body are telling you they need rest. This is a real physical and emotional state.",
            "What you're describing is classic burnout. It happens when we give more than we have for an extended period. That numbness and fatigue are your system's way of protecting itself.",
            "That depletion makes sense. Burnout isn't just tiredness. It's emotional, mental, and physical exhaustion from sustained stress. Your body is asking for a break.",
        ],
        _ => &[
            "It sounds like you're dealing with a lot right now. What you're feeling is a natural response to the situation you're in. Your emotions are valid, and it's okay to feel this way.",
            "That's a tough situation to be in. Your feelings make sense given what you're going through. Sometimes just acknowledging what we're dealing with is the first step.",
            "I hear you. What you're experiencing sounds challenging, and your emotional response is completely understandable. You're not alone in feeling this way.",
        ],
    }
}

pub fn natural(category: Category) -> Pool {
    match category {
        Category::Anxiety => &[
            "That sounds really overwhelming. What's been making you feel this way?",
            "I hear you. Want to talk about what's causing that anxiety?",
            "Sounds like a lot is on your mind. What's the biggest thing weighing on you?",
        ],
        Category::Depression => &[
            "That heaviness sounds tough. How long have you been feeling this way?",
            "I'm here with you. What does this feel like for you right now?",
            "That sounds really hard. Want to tell me more about what's going on?",
        ],
        Category::Stress => &[
            "That sounds like a lot of pressure. What's been piling up?",
            "Sounds intense. What's stressing you out the most?",
            "I can hear that strain. What's been happening?",
        ],
        Category::Loneliness => &[
            "Feeling disconnected is really hard. What's making you feel alone?",
            "That isolation sounds heavy. Want to talk about it?",
            "I'm here. What's been making you feel this way?",
        ],
        Category::Burnout => &[
            "That exhaustion sounds real. What's been draining you?",
            "Sounds like you've been pushing hard. What's wearing you down?",
            "That's a lot to carry. What's been going on?",
        ],
        _ => &[
            "I'm listening. What's going on with you?",
            "Tell me more. What's on your mind?",
            "What's been happening? I'm here.",
            "I'm here. What would you like to talk about?",
            "What's going on today?",
            "Talk to me. What's up?",
        ],
    }
}

/// Emotion-labelling prompts, used only once there is emotional history.
pub fn vague_extraction(category: Category) -> Pool {
    match category {
        Category::Anxiety => &[
            "That anxious feeling... is it more restless ⚡ or heavy 🪨?",
            "Sounds like the mind's racing. Want to ground it or just acknowledge it?",
            "Anxiety can feel like static. Is it loud or just buzzing in the background?",
            "Sometimes 'off' means anxious ⚡. Does that fit?",
            "Is this more worry or overwhelm right now?",
        ],
        Category::Depression => &[
            "That heaviness... is it more empty 🌫️ or just drained 💤?",
            "Blank days happen. Does it feel more grey ☁️ or black 🖤?",
            "Sometimes 'fine' hides a lot. Tired, sad, or numb?",
            "That quiet weight... want to talk about it or just sit with it?",
            "Is this more sadness or just flatness today?",
        ],
        Category::Stress => &[
            "That pressure sounds intense. Overwhelmed 🌊 or frustrated 🔥?",
            "Sounds like a lot's piling up. Want to vent or breathe?",
            "Is this a red day 🔥 or grey day ☁️?",
            "Stretched thin. What's the biggest weight right now?",
            "That tension... want to release it or ease it quietly?",
        ],
        Category::Loneliness => &[
            "That isolation... is it more empty 🌫️ or heavy 🪨?",
            "Feeling disconnected. Want company in words or just presence?",
            "Alone can feel different ways. Which fits today?",
            "That loneliness... quiet kind or loud kind?",
            "Is it more missing someone or just feeling apart?",
        ],
        Category::Burnout => &[
            "That exhaustion is real. Mentally drained 💤 or emotionally flat 🌫️?",
            "Running on empty. What's been taking the most out of you?",
            "Burnout hits different. Is it more tired or numb?",
            "Sounds like you've been pushing hard. Want to pause or push through gently?",
            "That drain... physical, mental, or both?",
        ],
        _ => &[
            "Sometimes 'off' feels like tired 💤, anxious ⚡, or empty 🌫️. Which one?",
            "If you had to pick: heavy 🪨, cloudy ☁️, or restless ⚡?",
            "Would you rather talk, breathe, or just listen to something calming?",
            "What does today feel like for you?",
            "Is this more a quiet day or a heavy day?",
        ],
    }
}

pub fn medium_confidence(category: Category) -> Pool {
    match category {
        Category::Anxiety => &[
            "Sounds like the mind's racing. Want to ground it or talk through what's spinning?",
            "That anxious edge... ease it quietly or work through it?",
            "Feels like a lot's churning. Calm or distraction?",
        ],
        Category::Panic => &[
            "Let's slow this down. One breath with me?",
            "You're safe. Can you name 3 things you see right now?",
            "Breathe with me. In through your nose, out slowly.",
        ],
        Category::Depression => &[
            "That heaviness is real. Want to ease it or just sit with it quietly?",
            "Sounds draining. Talk or reset?",
            "Grey kind of day. Want help lightening it?",
        ],
        Category::Stress => &[
            "That's a lot on you. Vent or cool down?",
            "Sounds like pressure's building. Release or reset?",
            "Want to talk through it or shift the energy?",
        ],
        Category::Loneliness => &[
            "Feeling disconnected. Want to talk or just be here quietly?",
            "That isolation's heavy. Share more or ease it gently?",
            "You're not alone right now. Talk or just breathe?",
        ],
        Category::Burnout => &[
            "Running on empty. What do you need: rest, vent, or reset?",
            "That exhaustion's real. Pause or push through gently?",
            "Sounds like you need a break. Quiet reset or talk?",
        ],
        _ => &[
            "Sounds like something's weighing on you. Want to talk or ease it quietly?",
            "What would help right now: calm, talk, or distraction?",
            "Tell me more, or should we just reset?",
        ],
    }
}

pub fn high_confidence(category: Category) -> Pool {
    match category {
        Category::Anxiety => &[
            "That anxiety's loud. Ground your thoughts or ease it quietly?",
            "Want to talk through what triggered it or just calm the noise?",
            "Let's settle this. Breathe or talk?",
        ],
        Category::Panic => &[
            "Breathe with me. In... out. You're safe.",
            "Ground yourself. Name 3 things you can see.",
            "Slow it down. One breath at a time.",
        ],
        Category::Depression => &[
            "That weight's real. Want to lighten it or just acknowledge it?",
            "Feels heavy today. Talk or quiet reset?",
            "I'm here. Ease it gently or sit with it?",
        ],
        Category::Stress => &[
            "That pressure's intense. Vent it out or cool down?",
            "Want to release it or shift focus?",
            "Talk through it or reset quietly?",
        ],
        Category::Loneliness => &[
            "That emptiness is hard. Want company in words or just presence?",
            "You're not alone. Talk or just be?",
            "I'm here. Share or just breathe together?",
        ],
        Category::Burnout => &[
            "You're drained. Rest, vent, or gentle reset?",
            "That exhaustion's deep. What do you need right now?",
            "Time to pause. How can I help?",
        ],
        _ => &[
            "What would help: talk, calm, or quiet focus?",
            "I'm here. What do you need?",
            "Tell me more or should we ease this quietly?",
        ],
    }
}
