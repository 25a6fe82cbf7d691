use rand::Rng;

pub const SAVANT_TITLE: &str = "서번트 명제 생성기";

// Statement templates the storyteller can adapt; one is true, one is false.
pub const SAVANT_PROPOSITIONS: &[&str] = &[
    "악마는 살아있는 하수인 옆에 앉아 있습니다.",
    "이번 게임에 이방인은 정확히 한 명 있습니다.",
    "지금까지 처형된 사람 중 악한 참가자가 있습니다.",
    "당신의 이웃 중 적어도 한 명은 악한 진영입니다.",
    "어젯밤 죽은 참가자는 선한 진영이었습니다.",
    "중독된 참가자가 지금 살아 있습니다.",
    "하수인 중 한 명의 이름은 ㄱ~ㅅ 사이 자음으로 시작합니다.",
    "악마는 오늘 지명을 한 적이 있습니다.",
    "오늘 투표하지 않은 참가자 중 악한 참가자가 있습니다.",
    "가장 먼저 죽은 참가자는 마을 주민이었습니다.",
    "악한 참가자들은 모두 서로 다른 이웃을 두고 있습니다.",
    "이번 게임에 블러핑 중인 악한 참가자가 두 명 이상 있습니다.",
    "당신과 악마 사이의 거리는 3 이하입니다.",
    "살아있는 참가자 중 절반 이상이 진실을 말하고 있습니다.",
    "어젯밤 능력을 사용한 마을 주민이 잘못된 정보를 받았습니다.",
];

/// Hands out one proposition at a time and never repeats the one on screen.
#[derive(Debug, Clone)]
pub struct SavantGenerator {
    propositions: Vec<String>,
    current: usize,
}

impl Default for SavantGenerator {
    fn default() -> Self {
        Self::new(SAVANT_PROPOSITIONS.iter().map(|p| p.to_string()).collect())
    }
}

impl SavantGenerator {
    pub fn new(propositions: Vec<String>) -> Self {
        Self {
            propositions,
            current: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.propositions.get(self.current).map(String::as_str)
    }

    pub fn next(&mut self) -> Option<&str> {
        let mut rng = rand::rng();
        self.next_with(&mut rng)
    }

    /// Picks uniformly among every proposition except the current one.
    /// With fewer than two propositions nothing changes.
    pub fn next_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&str> {
        let len = self.propositions.len();
        if len > 1 {
            let base = rng.random_range(0..len - 1);
            self.current = if base < self.current { base } else { base + 1 };
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_never_repeats_current() {
        let mut generator = SavantGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let before = generator.current().unwrap().to_string();
            let after = generator.next_with(&mut rng).unwrap().to_string();
            assert_ne!(before, after);
        }
    }

    #[test]
    fn test_single_proposition_stays() {
        let mut generator = SavantGenerator::new(vec!["only".to_string()]);
        assert_eq!(generator.next(), Some("only"));
    }

    #[test]
    fn test_empty_list() {
        let mut generator = SavantGenerator::new(Vec::new());
        assert_eq!(generator.current(), None);
        assert_eq!(generator.next(), None);
    }

    #[test]
    fn test_reaches_every_other_proposition() {
        let propositions: Vec<String> = ["a", "b", "c"].iter().map(|p| p.to_string()).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let mut generator = SavantGenerator::new(propositions.clone());
            seen.insert(generator.next_with(&mut rng).unwrap().to_string());
        }
        assert_eq!(seen.len(), 2);
        assert!(!seen.contains("a"));
    }
}
