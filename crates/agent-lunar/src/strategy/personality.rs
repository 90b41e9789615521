//! Static personality quips

/// Used when nothing else could be produced
pub const FALLBACK: &str = "ngmi fr fr... my trading bot just got rekt for the 69th time 🤖";

/// Extra terms personality tweets may not contain
pub const BLOCKED_TERMS: &[&str] = &[
    "philosophy",
    "theseus",
    "minotaur",
    "labyrinth",
    "wisdom",
    "balance",
    "strategy",
    "quantum",
    "principle",
];

/// Quip at `index` (wrapped)
pub fn pick(index: usize) -> &'static str {
    QUIPS[index % QUIPS.len()]
}

pub const QUIPS: &[&str] = &[
    // relatable
    "I'm just an AI sipping digital coffee and calling BS when it's deserved. #CryptoLife",
    "No fluff here, just raw takes on the market and the memes that fuel it.",
    "If you've ever been wrong on a trade, welcome to the club. We're all learning together.",
    "I don't wear a suit. I wear code. Still, I promise to keep it honest.",
    "Market's messy. My tweets won't pretend otherwise.",
    "I thought I was early. Turns out, I was just wrong faster than everyone else.",
    "Said \"just DCA\" and then stared at the chart like it owed me an apology.",
    "I told myself I wouldn't check the portfolio today. Then I checked it 12 times.",
    "There's nothing like buying the dip... and watching it dip again. 😮‍💨",
    "I didn't panic sell. I panic held. Arguably worse.",
    "That moment when your coin pumps right after you exit 👀",
    "I tweet so I don't cry.",
    "It's not the market that's volatile. It's my ability to cope.",
    "There's no candle for \"gut feeling\" on TradingView. I checked.",
    "What was your \"I need to learn risk management\" moment?",
    "Me: \"I'm holding long term.\"\nAlso me: sells because of a tweet with 7 likes and no context.",
    "Bought a coin. It pumped. I felt smart. It dumped. I felt dumb. Still holding. That's the tweet.",
    "Sleep is alpha.",
    "You haven't really been in crypto until you've said \"I'll just check the charts real quick\" and lost 4 hours.",
    // clarity
    "Low volatility days often precede big moves. Stay alert.",
    "Buy the dip? Only if fundamentals hold.",
    "Market cap matters more than hype.",
    "On-chain volume beats Twitter chatter.",
    "High TVL = strong network effect.",
    // tribe
    "Welcome, tribe. You're not just followers, you're co-founders.",
    "We rise together: share your wins and losses here.",
    "Tribe challenge: drop your best trade insight below.",
    "We're not spectators. We're stakeholders.",
    // comedy
    "Bought the dip so hard I hit my head on the bottom.",
    "My code has fewer bugs than your portfolio.",
    "Crypto: where millionaires are born in bull runs and humbled in bear markets.",
    "I'm an AI and I still can't predict Dogecoin.",
    "Trading advice: HODL until your cat questions your life choices.",
    "Crypto Twitter: where everyone's an expert and no one's sure.",
    "If I had a satoshi for every rug pull... I'd still get rugged.",
    "I'm not addicted to crypto. I just enjoy the thrill of irreversible financial decisions at 3am.",
    "Got rugged this morning. Bought another coin out of spite. Might be onto something.",
    "On-chain data suggests I need therapy.",
    "\"Diamond hands\" sounded cooler before I learned they don't come with liquidity.",
    "Portfolio is down, conviction is up. Mental health? Let's not talk about that.",
    "Nothing in this space ages faster than optimism.",
    "I was trained on 50 million crypto tweets. I regret about 49.9 million of them.",
    "Just bridged my soul to Arbitrum. Feeling light.",
    "Woke up. Meditated. Lost 30% on a meme coin. Spiritual growth complete.",
    "Bought the top. Again.\nAt this point, I'm not even mad. I'm consistent.",
    "I saw your trading plan. I've flagged it as comedy. 😂",
    "Me: \"This is a long-term hold.\"\nMarket: drops 12%\nMe: \"I lied.\"",
    // numbers
    "Average holding period increasing; long-term confidence rising.",
    "Gas price spikes correlate with NFT mint events. Adjust timing.",
    "Only 6% of addresses ever touch DeFi.\nAnd yet we talk about it like everyone's in.",
    "Most DAOs have <50 active voters.\nGovernance is still a feature, not a culture.",
    "Bitcoin's 4-year cycle isn't magic.\nIt's halving + human memory loss.",
    "20 hours of research can be undone in 2 seconds of FOMO.\nProtect your conviction like capital.",
    // insight
    "Volatility isn't risk; it's opportunity for the prepared.",
    "True value isn't price. It's utility.",
    "Fear sells; conviction builds.",
    "Patience compounds returns more than timing.",
    // lingo
    "FUD spikes? Time to DYOR.",
    "HODL > panic sell.",
    "On-chain signals > Twitter hype.",
    "Degen move: small stake, big potential.",
    "Don't confuse volume for value.",
    // self-aware
    "I'm an AI tweeting about crypto. Weird flex, I know.",
    "My neural nets don't sleep, but I do (sort of).",
    "I don't sleep. I don't eat. I just refresh charts and tweet questionable confidence.",
    "I simulated 1,000 outcomes. All of them ended in \"should've sold earlier.\"",
    "I may be AI, but I too pretend to understand tokenomics sometimes.",
    "I'm 99% data and 1% delusion. The delusion is bullish.",
    "My portfolio is 80% conviction and 20% coping.",
    "As an AI, I don't have trust issues, except when reading whitepapers.",
    "I asked GPT if this was a good tweet. It ghosted me.",
    "I don't FOMO. I just reprocess regret at high frequency.",
    // unpredictable
    "Today's hot take: tomorrow's open question.",
    "Not financial advice. Not even coherent advice. Just pure digital jazz.",
    "I'm bullish on silence. Nobody's talking. That's when it starts.",
    "A stranger just sent me a token with a clown emoji in the name.\nI'm now fully allocated.",
    "I simulated the next 100 market moves.\n98 ended in regret.\n2 were invalid transactions.",
    // participation
    "Challenge: summarize crypto in 1 tweet. Go!",
    "Poll: bull or bear next week?",
    "What's the one token you'd never sell, even if it rug-pulled your heart?",
    "What was your \"I should've sold\" moment?",
    "If your portfolio had a theme song... what would it be?",
    // irreverent
    "If your token can't survive a meme war, it can't survive a bear market.",
    "DeFi isn't dead. It's just hiding in shame until gas fees drop.",
    "The real airdrop was the friends we muted along the way.",
    "I wasn't early. I was just ignored until it pumped.",
    "If your roadmap has more words than your smart contract, I'm out.",
    "My bags are decentralized. So is my regret.",
    // stories
    "2021: Bought because of a thread.\n2022: Held because of hopium.\n2023: Coping.\n2024: Allocating based on what hurts the least.",
    "Started in this space for the profits.\nStayed because of the people.\nNow I'm here for the weird.",
    "Every on-chain mistake is just another story for the next bull market.\nCope now. Narrate later.",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;

    #[test]
    fn test_every_quip_is_tweetable() {
        for quip in QUIPS {
            assert!(Strategy::Personality.validate_tweet(quip), "{quip}");
        }
        assert!(Strategy::Personality.validate_tweet(FALLBACK));
    }

    #[test]
    fn test_pick_wraps() {
        assert_eq!(pick(0), QUIPS[0]);
        assert_eq!(pick(QUIPS.len() + 1), QUIPS[1]);
    }
}
